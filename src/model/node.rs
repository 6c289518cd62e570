//! Node-level types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural kind of a node.
///
/// Serialized as the host's SCREAMING_SNAKE_CASE type string. Types the
/// scanner has no rule for are kept verbatim in [`NodeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Vector,
    BooleanOperation,
    Star,
    Polygon,
    Ellipse,
    Line,
    Rectangle,
    Text,
    Slice,
    Other(String),
}

impl NodeType {
    /// Parse a host type string.
    pub fn parse(s: &str) -> Self {
        match s {
            "DOCUMENT" => NodeType::Document,
            "CANVAS" | "PAGE" => NodeType::Canvas,
            "FRAME" => NodeType::Frame,
            "GROUP" => NodeType::Group,
            "SECTION" => NodeType::Section,
            "COMPONENT" => NodeType::Component,
            "COMPONENT_SET" => NodeType::ComponentSet,
            "INSTANCE" => NodeType::Instance,
            "VECTOR" => NodeType::Vector,
            "BOOLEAN_OPERATION" => NodeType::BooleanOperation,
            "STAR" => NodeType::Star,
            "POLYGON" | "REGULAR_POLYGON" => NodeType::Polygon,
            "ELLIPSE" => NodeType::Ellipse,
            "LINE" => NodeType::Line,
            "RECTANGLE" => NodeType::Rectangle,
            "TEXT" => NodeType::Text,
            "SLICE" => NodeType::Slice,
            other => NodeType::Other(other.to_string()),
        }
    }

    /// Host type string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Canvas => "CANVAS",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Star => "STAR",
            NodeType::Polygon => "POLYGON",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::Line => "LINE",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Text => "TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Other(s) => s,
        }
    }

    /// Component, component set or instance.
    pub fn is_component_like(&self) -> bool {
        matches!(
            self,
            NodeType::Component | NodeType::ComponentSet | NodeType::Instance
        )
    }

    /// Frame or group: containers that may hold a hand-drawn icon.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Frame | NodeType::Group)
    }

    /// Types allowed as children of a vector-only icon container.
    pub fn is_vector_like(&self) -> bool {
        matches!(
            self,
            NodeType::Vector
                | NodeType::BooleanOperation
                | NodeType::Star
                | NodeType::Polygon
                | NodeType::Ellipse
                | NodeType::Line
                | NodeType::Rectangle
                | NodeType::Frame
                | NodeType::Group
        )
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        NodeType::parse(&s)
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    /// Create an opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Format as `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b)
        )
    }
}

fn channel_to_byte(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Kind of paint applied as a fill or stroke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Video,
    Other(String),
}

impl From<String> for PaintType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SOLID" => PaintType::Solid,
            "GRADIENT_LINEAR" => PaintType::GradientLinear,
            "GRADIENT_RADIAL" => PaintType::GradientRadial,
            "GRADIENT_ANGULAR" => PaintType::GradientAngular,
            "GRADIENT_DIAMOND" => PaintType::GradientDiamond,
            "IMAGE" => PaintType::Image,
            "VIDEO" => PaintType::Video,
            _ => PaintType::Other(s),
        }
    }
}

impl From<PaintType> for String {
    fn from(t: PaintType) -> Self {
        match t {
            PaintType::Solid => "SOLID".into(),
            PaintType::GradientLinear => "GRADIENT_LINEAR".into(),
            PaintType::GradientRadial => "GRADIENT_RADIAL".into(),
            PaintType::GradientAngular => "GRADIENT_ANGULAR".into(),
            PaintType::GradientDiamond => "GRADIENT_DIAMOND".into(),
            PaintType::Image => "IMAGE".into(),
            PaintType::Video => "VIDEO".into(),
            PaintType::Other(s) => s,
        }
    }
}

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    /// Paint kind
    #[serde(rename = "type")]
    pub paint_type: PaintType,

    /// Visibility flag; absent means visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Color for solid paints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Paint {
    /// Create a visible solid paint.
    pub fn solid(color: Color) -> Self {
        Self {
            paint_type: PaintType::Solid,
            visible: None,
            color: Some(color),
        }
    }

    /// Solid paint that is not explicitly hidden and has a color.
    pub fn visible_solid_color(&self) -> Option<Color> {
        if self.paint_type != PaintType::Solid || self.visible == Some(false) {
            return None;
        }
        self.color
    }
}

/// Main component of an instance, as known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainComponent {
    /// Node id of the component
    pub id: String,

    /// Component name
    pub name: String,

    /// Published component key (used for library lookups)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Defined in a library file other than the current document
    #[serde(default)]
    pub remote: bool,
}

impl MainComponent {
    /// Create a local main component reference.
    pub fn local(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key: None,
            remote: false,
        }
    }

    /// Create a remote main component reference.
    pub fn remote(id: impl Into<String>, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            key: Some(key.into()),
            remote: true,
        }
    }
}

/// A single element of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable id, unique within the document
    pub id: String,

    /// Display name
    pub name: String,

    /// Structural kind
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Width in document units
    pub width: f64,

    /// Height in document units
    pub height: f64,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Fill paints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,

    /// Stroke paints
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,

    /// Whether the node is visible
    #[serde(default = "visible_default")]
    pub visible: bool,

    /// Id of the main component (instances only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,

    /// Cached main component reference (instances only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_component: Option<MainComponent>,
}

fn visible_default() -> bool {
    true
}

impl Node {
    /// Create a new node with the given kind and size.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: NodeType,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            width,
            height,
            children: Vec::new(),
            fills: Vec::new(),
            strokes: Vec::new(),
            visible: true,
            component_id: None,
            main_component: None,
        }
    }

    /// Create an instance node pointing at a main component.
    pub fn instance(
        id: impl Into<String>,
        name: impl Into<String>,
        width: f64,
        height: f64,
        main: MainComponent,
    ) -> Self {
        let mut node = Self::new(id, name, NodeType::Instance, width, height);
        node.component_id = Some(main.id.clone());
        node.main_component = Some(main);
        node
    }

    /// Add a child node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Add a fill paint.
    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.fills.push(paint);
        self
    }

    /// Add a stroke paint.
    pub fn with_stroke(mut self, paint: Paint) -> Self {
        self.strokes.push(paint);
        self
    }

    /// Check if the node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including this node.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
