//! Document-level types.

use super::{MainComponent, Node, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parsed design document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (name, file key, etc.)
    pub metadata: Metadata,

    /// Pages in document order
    pub pages: Vec<Page>,

    /// Component table keyed by component node id (remote components included)
    pub components: HashMap<String, ComponentMeta>,

    /// Component set table keyed by node id
    pub component_sets: HashMap<String, ComponentMeta>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            pages: Vec::new(),
            components: HashMap::new(),
            component_sets: HashMap::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Get a page by id.
    pub fn page_by_id(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Get the first page with the given name.
    pub fn page_by_name(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Register a component in the component table.
    pub fn add_component(&mut self, id: impl Into<String>, meta: ComponentMeta) {
        self.components.insert(id.into(), meta);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of nodes across all pages.
    pub fn node_count(&self) -> usize {
        self.pages.iter().map(Page::node_count).sum()
    }

    /// Locate a node by id.
    pub fn find_node(&self, id: &str) -> Option<NodeLocation<'_>> {
        self.pages.iter().find_map(|page| {
            page.find_with_parent(id)
                .map(|(node, parent)| NodeLocation { page, node, parent })
        })
    }

    /// Describe the main component with the given id, if the document knows it.
    ///
    /// The component table wins over the node tree since it is the only
    /// place remote components and their keys appear.
    pub fn component_by_id(&self, component_id: &str) -> Option<MainComponent> {
        if let Some(meta) = self.components.get(component_id) {
            return Some(MainComponent {
                id: component_id.to_string(),
                name: meta.name.clone(),
                key: meta.key.clone(),
                remote: meta.remote,
            });
        }

        self.find_node(component_id)
            .filter(|loc| loc.node.node_type.is_component_like())
            .map(|loc| MainComponent::local(loc.node.id.clone(), loc.node.name.clone()))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a node lives in the document.
#[derive(Debug, Clone, Copy)]
pub struct NodeLocation<'a> {
    /// Owning page
    pub page: &'a Page,

    /// The node itself
    pub node: &'a Node,

    /// Immediate parent node, `None` for page roots
    pub parent: Option<&'a Node>,
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document name
    pub name: String,

    /// File key used in deep links
    pub file_key: Option<String>,

    /// Last modification date
    pub last_modified: Option<DateTime<Utc>>,

    /// Document version identifier
    pub version: Option<String>,

    /// Editor type (e.g., "figma", "figjam")
    pub editor_type: Option<String>,

    /// Total number of pages
    pub page_count: u32,

    /// Number of entries in the component table
    pub component_count: u32,
}

impl Metadata {
    /// Create new metadata with a document name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("document: \"{}\"", escape_yaml(&self.name)));
        if let Some(ref key) = self.file_key {
            lines.push(format!("file_key: \"{}\"", escape_yaml(key)));
        }
        if let Some(ref version) = self.version {
            lines.push(format!("version: \"{}\"", escape_yaml(version)));
        }
        if let Some(ref modified) = self.last_modified {
            lines.push(format!("last_modified: {}", modified.to_rfc3339()));
        }

        lines.push(format!("pages: {}", self.page_count));
        lines.push(format!("components: {}", self.component_count));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Entry of the document's component table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMeta {
    /// Published component key
    pub key: Option<String>,

    /// Component name
    pub name: String,

    /// Component description
    pub description: String,

    /// Defined in an external library
    pub remote: bool,

    /// Owning component set, if any
    pub component_set_id: Option<String>,
}

impl ComponentMeta {
    /// Create a component table entry.
    pub fn new(name: impl Into<String>, key: Option<String>, remote: bool) -> Self {
        Self {
            key,
            name: name.into(),
            remote,
            ..Default::default()
        }
    }
}
