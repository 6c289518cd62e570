//! Page-level types.

use super::Node;
use serde::{Deserialize, Serialize};

/// A single page (canvas) in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page id
    pub id: String,

    /// Human-readable page name
    pub name: String,

    /// Position in the document (1-indexed)
    pub index: u32,

    /// Root nodes in document order
    pub nodes: Vec<Node>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(id: impl Into<String>, name: impl Into<String>, index: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            index,
            nodes: Vec::new(),
        }
    }

    /// Add a root node to the page.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Builder-style variant of [`Page::add_node`].
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Check if the page has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes on the page.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::subtree_len).sum()
    }

    /// Find a node by id, together with its immediate parent (if not a root).
    pub fn find_with_parent(&self, id: &str) -> Option<(&Node, Option<&Node>)> {
        fn walk<'a>(
            node: &'a Node,
            parent: Option<&'a Node>,
            id: &str,
        ) -> Option<(&'a Node, Option<&'a Node>)> {
            if node.id == id {
                return Some((node, parent));
            }
            node.children
                .iter()
                .find_map(|child| walk(child, Some(node), id))
        }

        self.nodes.iter().find_map(|root| walk(root, None, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    #[test]
    fn test_page_new() {
        let page = Page::new("0:1", "Icons", 1);
        assert_eq!(page.name, "Icons");
        assert!(page.is_empty());
        assert_eq!(page.node_count(), 0);
    }

    #[test]
    fn test_find_with_parent() {
        let page = Page::new("0:1", "Icons", 1).with_node(
            Node::new("1:1", "Toolbar", NodeType::Frame, 300.0, 40.0)
                .with_child(Node::new("1:2", "Save", NodeType::Instance, 24.0, 24.0)),
        );

        let (node, parent) = page.find_with_parent("1:2").unwrap();
        assert_eq!(node.name, "Save");
        assert_eq!(parent.map(|p| p.id.as_str()), Some("1:1"));

        let (root, parent) = page.find_with_parent("1:1").unwrap();
        assert_eq!(root.name, "Toolbar");
        assert!(parent.is_none());

        assert_eq!(page.node_count(), 2);
    }
}
