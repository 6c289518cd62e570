//! Request/response messages between a UI and the scanning host.
//!
//! Messages are tagged JSON objects (`{"type": "scan-page", ...}`), so any
//! transport that moves JSON can carry them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Document, Page};
use crate::navigate::{select_node, select_nodes, Viewport, NODE_NOT_FOUND};
use crate::scan::{ComponentSource, IconRecord, ScanOptions, Scanner};

/// Request sent to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Request {
    /// Scan one page; the current page when no id is given
    ScanPage {
        #[serde(default, rename = "pageId", skip_serializing_if = "Option::is_none")]
        page_id: Option<String>,
    },
    /// Scan every selected page in document order
    ScanDocument,
    /// Select and reveal one node
    SelectNode { id: String },
    /// Select several nodes
    SelectNodes { ids: Vec<String> },
}

/// Host reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Response {
    /// Icons found by a scan
    ScanResults { icons: Vec<IconRecord> },
    /// Nodes were selected
    Selected {
        count: usize,
        #[serde(rename = "pageId")]
        page_id: String,
    },
    /// A single node could not be resolved
    NotFound { message: String },
    /// Nothing happened
    Idle,
}

impl Request {
    /// Decode a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Response {
    /// Encode the response as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Handle one request against a document.
///
/// Only input problems are errors: an invalid name pattern in `options`
/// or an unknown page id. Unresolvable nodes and failed lookups are
/// reported in the response or absorbed.
pub fn handle_request<S, V>(
    doc: &Document,
    source: &S,
    viewport: &mut V,
    options: &ScanOptions,
    request: &Request,
) -> Result<Response>
where
    S: ComponentSource + ?Sized,
    V: Viewport + ?Sized,
{
    match request {
        Request::ScanPage { page_id } => {
            let page = match page_id {
                Some(id) => Some(
                    doc.page_by_id(id)
                        .ok_or_else(|| Error::PageNotFound(id.clone()))?,
                ),
                None => current_page(doc, viewport),
            };
            let icons = match page {
                Some(page) => scanner(doc, source, options)?.scan_page(page),
                None => Vec::new(),
            };
            Ok(Response::ScanResults { icons })
        }
        Request::ScanDocument => {
            let icons = scanner(doc, source, options)?.scan_document(doc);
            Ok(Response::ScanResults { icons })
        }
        Request::SelectNode { id } => Ok(match select_node(doc, viewport, id)? {
            Some(selection) => Response::Selected {
                count: selection.len(),
                page_id: selection.page_id,
            },
            None => Response::NotFound {
                message: NODE_NOT_FOUND.to_string(),
            },
        }),
        Request::SelectNodes { ids } => Ok(match select_nodes(doc, viewport, ids)? {
            Some(selection) => Response::Selected {
                count: selection.len(),
                page_id: selection.page_id,
            },
            None => Response::Idle,
        }),
    }
}

fn scanner<'a, S>(doc: &Document, source: &'a S, options: &ScanOptions) -> Result<Scanner<'a, S>>
where
    S: ComponentSource + ?Sized,
{
    Scanner::new(source, doc.metadata.file_key.as_deref(), options.clone())
}

/// The viewport's page, falling back to the first page.
fn current_page<'d, V: Viewport + ?Sized>(doc: &'d Document, viewport: &V) -> Option<&'d Page> {
    viewport
        .current_page()
        .and_then(|id| doc.page_by_id(id))
        .or_else(|| doc.pages.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeType};
    use crate::navigate::{Notice, RecordingViewport};

    fn doc() -> Document {
        let mut doc = Document::new();
        doc.add_page(
            Page::new("0:1", "Icons", 1)
                .with_node(Node::new("1:1", "icon-a", NodeType::Vector, 24.0, 24.0))
                .with_node(Node::new("1:2", "icon-b", NodeType::Vector, 24.0, 24.0)),
        );
        doc.add_page(
            Page::new("0:2", "More", 2)
                .with_node(Node::new("2:1", "icon-c", NodeType::Vector, 24.0, 24.0)),
        );
        doc
    }

    fn handle(doc: &Document, viewport: &mut RecordingViewport, request: Request) -> Response {
        handle_request(doc, doc, viewport, &ScanOptions::default(), &request).unwrap()
    }

    fn icon_ids(response: &Response) -> Vec<String> {
        match response {
            Response::ScanResults { icons } => icons.iter().map(|i| i.id.clone()).collect(),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let req = Request::from_json(r#"{"type":"scan-page","pageId":"0:2"}"#).unwrap();
        assert_eq!(
            req,
            Request::ScanPage {
                page_id: Some("0:2".into())
            }
        );

        let req = Request::from_json(r#"{"type":"scan-page"}"#).unwrap();
        assert_eq!(req, Request::ScanPage { page_id: None });

        let req = Request::from_json(r#"{"type":"select-nodes","ids":["1:1","1:2"]}"#).unwrap();
        assert!(matches!(req, Request::SelectNodes { ref ids } if ids.len() == 2));

        assert!(Request::from_json(r#"{"type":"resize"}"#).is_err());
    }

    #[test]
    fn test_response_wire_format() {
        let json = Response::Selected {
            count: 2,
            page_id: "0:1".into(),
        }
        .to_json()
        .unwrap();
        assert_eq!(json, r#"{"type":"selected","count":2,"pageId":"0:1"}"#);
        assert_eq!(Response::Idle.to_json().unwrap(), r#"{"type":"idle"}"#);
    }

    #[test]
    fn test_scan_current_page() {
        let doc = doc();
        let mut viewport = RecordingViewport::on_page("0:2");
        let response = handle(&doc, &mut viewport, Request::ScanPage { page_id: None });
        assert_eq!(icon_ids(&response), vec!["2:1"]);

        let mut viewport = RecordingViewport::new();
        let response = handle(&doc, &mut viewport, Request::ScanPage { page_id: None });
        assert_eq!(icon_ids(&response), vec!["1:1", "1:2"]);
    }

    #[test]
    fn test_scan_unknown_page_is_error() {
        let doc = doc();
        let mut viewport = RecordingViewport::new();
        let request = Request::ScanPage {
            page_id: Some("7:7".into()),
        };
        let err = handle_request(&doc, &doc, &mut viewport, &ScanOptions::default(), &request)
            .unwrap_err();
        assert!(matches!(err, Error::PageNotFound(_)));
    }

    #[test]
    fn test_scan_document_concatenates_pages() {
        let doc = doc();
        let mut viewport = RecordingViewport::new();
        let response = handle(&doc, &mut viewport, Request::ScanDocument);
        assert_eq!(icon_ids(&response), vec!["1:1", "1:2", "2:1"]);
    }

    #[test]
    fn test_select_requests() {
        let doc = doc();
        let mut viewport = RecordingViewport::new();

        let response = handle(&doc, &mut viewport, Request::SelectNode { id: "2:1".into() });
        assert_eq!(
            response,
            Response::Selected {
                count: 1,
                page_id: "0:2".into()
            }
        );

        let response = handle(&doc, &mut viewport, Request::SelectNode { id: "9:9".into() });
        assert!(matches!(response, Response::NotFound { .. }));
        assert_eq!(viewport.notices.last(), Some(&Notice::error(NODE_NOT_FOUND)));

        let response = handle(
            &doc,
            &mut viewport,
            Request::SelectNodes {
                ids: vec!["9:9".into()],
            },
        );
        assert_eq!(response, Response::Idle);
    }
}
