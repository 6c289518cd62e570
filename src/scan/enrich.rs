//! Per-match enrichment: library resolution and color extraction.

use crate::model::{Node, NodeType};

use super::link::LinkBuilder;
use super::record::{LinkedComponent, EXTERNAL_LIBRARY, LOCAL_COMPONENTS};
use super::source::{resolve_main_component, ComponentSource, Resolution};

/// Library linkage of a matched node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryInfo {
    /// Library classification
    pub library: Option<String>,

    /// Main component, for instances that have one
    pub linked_from: Option<LinkedComponent>,

    /// Lookups that failed and were absorbed
    pub lookup_failures: u32,
}

/// Resolve library classification and main-component linkage for a matched node.
pub fn resolve_library<S>(
    node: &Node,
    source: &S,
    links: &LinkBuilder,
    resolve_names: bool,
) -> LibraryInfo
where
    S: ComponentSource + ?Sized,
{
    match node.node_type {
        NodeType::Component | NodeType::ComponentSet => LibraryInfo {
            library: Some(LOCAL_COMPONENTS.to_string()),
            ..Default::default()
        },
        NodeType::Instance => resolve_instance(node, source, links, resolve_names),
        _ => LibraryInfo::default(),
    }
}

fn resolve_instance<S>(
    node: &Node,
    source: &S,
    links: &LinkBuilder,
    resolve_names: bool,
) -> LibraryInfo
where
    S: ComponentSource + ?Sized,
{
    let mut info = LibraryInfo::default();

    let resolution = resolve_main_component(source, node);
    if resolution.is_cached() {
        info.lookup_failures += 1;
    }
    let main = match resolution {
        Resolution::Resolved(main) | Resolution::Cached(main) => main,
        Resolution::Absent => return info,
    };

    let library = if !main.remote {
        LOCAL_COMPONENTS.to_string()
    } else {
        let resolved = match main.key.as_deref() {
            Some(key) if resolve_names => match source.library_name(key) {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("Library lookup failed for component key {}: {}", key, e);
                    info.lookup_failures += 1;
                    None
                }
            },
            _ => None,
        };
        resolved.unwrap_or_else(|| EXTERNAL_LIBRARY.to_string())
    };

    info.linked_from = Some(LinkedComponent {
        name: main.name,
        link: links.node_link(&main.id),
        id: main.id,
        library: library.clone(),
        is_remote: main.remote,
    });
    info.library = Some(library);
    info
}

/// Collect distinct solid fill and stroke colors from a node and its
/// descendants, pre-order, stopping at `max_colors`.
pub fn extract_colors(node: &Node, max_colors: usize) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();
    if max_colors == 0 {
        return colors;
    }

    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        for paint in current.fills.iter().chain(current.strokes.iter()) {
            if let Some(color) = paint.visible_solid_color() {
                let hex = color.to_hex();
                if !colors.contains(&hex) {
                    colors.push(hex);
                    if colors.len() >= max_colors {
                        return colors;
                    }
                }
            }
        }
        stack.extend(current.children.iter().rev());
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::model::{Color, MainComponent, Paint};

    struct StaticSource(Option<MainComponent>);

    impl ComponentSource for StaticSource {
        fn main_component(&self, _instance: &Node) -> Result<Option<MainComponent>> {
            Ok(self.0.clone())
        }

        fn library_name(&self, component_key: &str) -> Result<Option<String>> {
            match component_key {
                "k-material" => Ok(Some("Material Icons".into())),
                "k-broken" => Err(Error::Lookup("timeout".into())),
                _ => Ok(None),
            }
        }
    }

    struct FailingSource;

    impl ComponentSource for FailingSource {
        fn main_component(&self, _instance: &Node) -> Result<Option<MainComponent>> {
            Err(Error::Lookup("offline".into()))
        }
    }

    fn links() -> LinkBuilder {
        LinkBuilder::new("www.figma.com", Some("FILE"))
    }

    fn filled(id: &str, color: Color) -> Node {
        Node::new(id, "shape", NodeType::Vector, 10.0, 10.0).with_fill(Paint::solid(color))
    }

    #[test]
    fn test_component_is_local() {
        let node = Node::new("1:1", "star", NodeType::Component, 24.0, 24.0);
        let info = resolve_library(&node, &StaticSource(None), &links(), true);
        assert_eq!(info.library.as_deref(), Some(LOCAL_COMPONENTS));
        assert!(info.linked_from.is_none());
    }

    #[test]
    fn test_frame_has_no_library() {
        let node = Node::new("1:1", "icon-star", NodeType::Frame, 24.0, 24.0);
        let info = resolve_library(&node, &StaticSource(None), &links(), true);
        assert_eq!(info, LibraryInfo::default());
    }

    #[test]
    fn test_local_instance() {
        let node = Node::new("1:1", "star", NodeType::Instance, 24.0, 24.0);
        let source = StaticSource(Some(MainComponent::local("5:1", "Star")));
        let info = resolve_library(&node, &source, &links(), true);

        assert_eq!(info.library.as_deref(), Some(LOCAL_COMPONENTS));
        let linked = info.linked_from.unwrap();
        assert_eq!(linked.name, "Star");
        assert_eq!(linked.id, "5:1");
        assert_eq!(linked.link, "https://www.figma.com/file/FILE?node-id=5%3A1");
        assert!(!linked.is_remote);
    }

    #[test]
    fn test_remote_instance_library_name() {
        let node = Node::new("1:1", "home", NodeType::Instance, 24.0, 24.0);

        let source = StaticSource(Some(MainComponent::remote("9:1", "home", "k-material")));
        let info = resolve_library(&node, &source, &links(), true);
        assert_eq!(info.library.as_deref(), Some("Material Icons"));
        assert_eq!(info.linked_from.unwrap().library, "Material Icons");

        // name resolution off
        let info = resolve_library(&node, &source, &links(), false);
        assert_eq!(info.library.as_deref(), Some(EXTERNAL_LIBRARY));

        // unknown key
        let source = StaticSource(Some(MainComponent::remote("9:1", "home", "k-other")));
        let info = resolve_library(&node, &source, &links(), true);
        assert_eq!(info.library.as_deref(), Some(EXTERNAL_LIBRARY));
        assert!(info.linked_from.unwrap().is_remote);

        // failing lookup
        let source = StaticSource(Some(MainComponent::remote("9:1", "home", "k-broken")));
        let info = resolve_library(&node, &source, &links(), true);
        assert_eq!(info.library.as_deref(), Some(EXTERNAL_LIBRARY));
        assert_eq!(info.lookup_failures, 1);
    }

    #[test]
    fn test_failed_lookup_uses_cache_then_absent() {
        let cached = MainComponent::local("5:1", "Star");
        let node = Node::instance("1:1", "star", 24.0, 24.0, cached);
        let info = resolve_library(&node, &FailingSource, &links(), true);
        assert_eq!(info.library.as_deref(), Some(LOCAL_COMPONENTS));
        assert_eq!(info.lookup_failures, 1);

        let bare = Node::new("1:2", "star", NodeType::Instance, 24.0, 24.0);
        let info = resolve_library(&bare, &FailingSource, &links(), true);
        assert!(info.library.is_none());
        assert!(info.linked_from.is_none());
    }

    #[test]
    fn test_color_cap_keeps_first_seen() {
        let mut node = Node::new("1:1", "palette", NodeType::Frame, 40.0, 40.0);
        for i in 0..8 {
            let v = i as f64 * 0.125;
            node.children.push(filled(&format!("1:{}", i + 2), Color::rgb(v, 0.0, 0.0)));
        }
        let colors = extract_colors(&node, 5);
        assert_eq!(
            colors,
            vec!["#000000", "#200000", "#400000", "#600000", "#800000"]
        );
    }

    #[test]
    fn test_color_dedup_and_order() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);
        let node = Node::new("1:1", "icon", NodeType::Frame, 24.0, 24.0)
            .with_stroke(Paint::solid(blue))
            .with_fill(Paint::solid(red))
            .with_child(filled("1:2", red))
            .with_child(filled("1:3", red));

        // fills before strokes on the same node
        assert_eq!(extract_colors(&node, 5), vec!["#ff0000", "#0000ff"]);
    }

    #[test]
    fn test_colors_skip_hidden_and_gradients() {
        let mut hidden = Paint::solid(Color::rgb(0.0, 1.0, 0.0));
        hidden.visible = Some(false);
        let node = Node::new("1:1", "icon", NodeType::Vector, 24.0, 24.0)
            .with_fill(hidden)
            .with_fill(Paint {
                paint_type: crate::model::PaintType::Image,
                visible: None,
                color: None,
            });
        assert!(extract_colors(&node, 5).is_empty());
        assert!(extract_colors(&filled("1:2", Color::rgb(1.0, 1.0, 1.0)), 0).is_empty());
    }
}
