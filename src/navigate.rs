//! Navigating a host view to scanned icons.
//!
//! The host view sits behind [`Viewport`]. Node ids are resolved against
//! the parsed [`Document`]; ids that do not resolve (typically nodes living
//! in a library file that is not loaded) never cause an error.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Document;

/// Message shown when a single node cannot be found.
pub const NODE_NOT_FOUND: &str = "Could not find node. It may be in an external library file.";

/// User-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message text
    pub message: String,
    /// Shown as an error
    pub error: bool,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
        }
    }
}

/// Host view: current page, selection, scroll/zoom and notifications.
pub trait Viewport {
    /// Id of the page currently shown, if any.
    fn current_page(&self) -> Option<&str>;

    /// Switch to a page.
    fn set_current_page(&mut self, page_id: &str) -> Result<()>;

    /// Replace the selection on the current page.
    fn set_selection(&mut self, node_ids: &[String]) -> Result<()>;

    /// Bring nodes into view.
    fn scroll_and_zoom_into_view(&mut self, node_ids: &[String]) -> Result<()>;

    /// Show a notification.
    fn notify(&mut self, notice: Notice);
}

/// What a successful selection did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Page the view switched to
    pub page_id: String,
    /// Selected node ids, in request order
    pub node_ids: Vec<String>,
}

impl Selection {
    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

/// Select one node and bring it into view.
///
/// An unknown id produces one error notice and `Ok(None)`.
pub fn select_node<V>(doc: &Document, viewport: &mut V, id: &str) -> Result<Option<Selection>>
where
    V: Viewport + ?Sized,
{
    let Some(location) = doc.find_node(id) else {
        log::debug!("Node {} not found in '{}'", id, doc.metadata.name);
        viewport.notify(Notice::error(NODE_NOT_FOUND));
        return Ok(None);
    };

    let selection = Selection {
        page_id: location.page.id.clone(),
        node_ids: vec![location.node.id.clone()],
    };
    apply(viewport, &selection)?;
    Ok(Some(selection))
}

/// Select several nodes on the page of the first one that resolves.
///
/// Unknown ids are skipped. When none resolve this is a no-op: nothing is
/// selected and no notice is shown.
pub fn select_nodes<V, I>(doc: &Document, viewport: &mut V, ids: I) -> Result<Option<Selection>>
where
    V: Viewport + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut page_id: Option<String> = None;
    let mut node_ids = Vec::new();

    for id in ids {
        let id = id.as_ref();
        match doc.find_node(id) {
            Some(location) => {
                page_id.get_or_insert_with(|| location.page.id.clone());
                node_ids.push(location.node.id.clone());
            }
            None => log::debug!("Skipping unknown node {}", id),
        }
    }

    let Some(page_id) = page_id else {
        return Ok(None);
    };

    let selection = Selection { page_id, node_ids };
    apply(viewport, &selection)?;
    viewport.notify(Notice::info(selected_message(selection.len())));
    Ok(Some(selection))
}

fn apply<V: Viewport + ?Sized>(viewport: &mut V, selection: &Selection) -> Result<()> {
    if viewport.current_page() != Some(selection.page_id.as_str()) {
        viewport.set_current_page(&selection.page_id)?;
    }
    viewport.set_selection(&selection.node_ids)?;
    viewport.scroll_and_zoom_into_view(&selection.node_ids)
}

fn selected_message(count: usize) -> String {
    if count == 1 {
        "Selected 1 icon".to_string()
    } else {
        format!("Selected {} icons", count)
    }
}

/// Viewport that records every call, for tooling and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingViewport {
    /// Current page id
    pub page: Option<String>,
    /// Current selection
    pub selection: Vec<String>,
    /// Nodes last scrolled into view
    pub in_view: Vec<String>,
    /// Notices in the order they were shown
    pub notices: Vec<Notice>,
    /// Number of page switches
    pub page_switches: u32,
}

impl RecordingViewport {
    /// Create a viewport with no current page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport showing a page.
    pub fn on_page(page_id: impl Into<String>) -> Self {
        Self {
            page: Some(page_id.into()),
            ..Default::default()
        }
    }
}

impl Viewport for RecordingViewport {
    fn current_page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    fn set_current_page(&mut self, page_id: &str) -> Result<()> {
        self.page = Some(page_id.to_string());
        self.page_switches += 1;
        // Selection belongs to a page.
        self.selection.clear();
        Ok(())
    }

    fn set_selection(&mut self, node_ids: &[String]) -> Result<()> {
        self.selection = node_ids.to_vec();
        Ok(())
    }

    fn scroll_and_zoom_into_view(&mut self, node_ids: &[String]) -> Result<()> {
        self.in_view = node_ids.to_vec();
        Ok(())
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeType, Page};

    fn doc() -> Document {
        let mut doc = Document::new();
        doc.add_page(
            Page::new("0:1", "Icons", 1).with_node(
                Node::new("1:1", "Toolbar", NodeType::Frame, 400.0, 40.0)
                    .with_child(Node::new("1:2", "icon-save", NodeType::Vector, 24.0, 24.0))
                    .with_child(Node::new("1:3", "icon-open", NodeType::Vector, 24.0, 24.0)),
            ),
        );
        doc.add_page(
            Page::new("0:2", "Archive", 2)
                .with_node(Node::new("2:1", "icon-old", NodeType::Vector, 24.0, 24.0)),
        );
        doc
    }

    #[test]
    fn test_select_node_switches_page() {
        let doc = doc();
        let mut viewport = RecordingViewport::on_page("0:1");

        let selection = select_node(&doc, &mut viewport, "2:1").unwrap().unwrap();
        assert_eq!(selection.page_id, "0:2");
        assert_eq!(viewport.page.as_deref(), Some("0:2"));
        assert_eq!(viewport.selection, vec!["2:1"]);
        assert_eq!(viewport.in_view, vec!["2:1"]);
        assert!(viewport.notices.is_empty());
    }

    #[test]
    fn test_select_node_on_current_page() {
        let doc = doc();
        let mut viewport = RecordingViewport::on_page("0:1");
        select_node(&doc, &mut viewport, "1:3").unwrap();
        assert_eq!(viewport.page_switches, 0);
        assert_eq!(viewport.selection, vec!["1:3"]);
    }

    #[test]
    fn test_select_unknown_node_notifies() {
        let doc = doc();
        let mut viewport = RecordingViewport::on_page("0:1");

        assert!(select_node(&doc, &mut viewport, "99:1").unwrap().is_none());
        assert_eq!(viewport.notices, vec![Notice::error(NODE_NOT_FOUND)]);
        assert_eq!(viewport.page.as_deref(), Some("0:1"));
        assert!(viewport.selection.is_empty());
    }

    #[test]
    fn test_select_nodes_skips_unknown() {
        let doc = doc();
        let mut viewport = RecordingViewport::new();

        let selection = select_nodes(&doc, &mut viewport, ["99:1", "1:2", "1:3"])
            .unwrap()
            .unwrap();
        assert_eq!(selection.page_id, "0:1");
        assert_eq!(viewport.selection, vec!["1:2", "1:3"]);
        assert_eq!(viewport.notices, vec![Notice::info("Selected 2 icons")]);
    }

    #[test]
    fn test_select_nodes_uses_first_page() {
        let doc = doc();
        let mut viewport = RecordingViewport::new();

        select_nodes(&doc, &mut viewport, ["2:1", "1:2"]).unwrap();
        assert_eq!(viewport.page.as_deref(), Some("0:2"));
        assert_eq!(viewport.selection, vec!["2:1", "1:2"]);
    }

    #[test]
    fn test_select_nodes_singular_message() {
        let doc = doc();
        let mut viewport = RecordingViewport::new();
        select_nodes(&doc, &mut viewport, vec!["1:2".to_string()]).unwrap();
        assert_eq!(viewport.notices[0].message, "Selected 1 icon");
    }

    #[test]
    fn test_select_nodes_empty_is_noop() {
        let doc = doc();
        let mut viewport = RecordingViewport::on_page("0:1");

        let none: [&str; 0] = [];
        assert!(select_nodes(&doc, &mut viewport, none).unwrap().is_none());
        assert!(select_nodes(&doc, &mut viewport, ["98:1", "99:1"]).unwrap().is_none());
        assert_eq!(viewport, RecordingViewport::on_page("0:1"));
    }
}
