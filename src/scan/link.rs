//! Deep links into the host application.

use super::options::DEFAULT_LINK_HOST;

/// Builds `https://<host>/file/<file-key>?node-id=<id>` links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    host: String,
    file_key: String,
}

impl LinkBuilder {
    /// Create a link builder for a file.
    ///
    /// An unknown file key produces links with an empty key segment.
    pub fn new(host: impl Into<String>, file_key: Option<&str>) -> Self {
        Self {
            host: host.into(),
            file_key: file_key.unwrap_or_default().to_string(),
        }
    }

    /// Link to a node of this file.
    pub fn node_link(&self, node_id: &str) -> String {
        format!(
            "https://{}/file/{}?node-id={}",
            self.host,
            self.file_key,
            urlencoding::encode(node_id)
        )
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LINK_HOST, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_link_encodes_id() {
        let links = LinkBuilder::new("www.figma.com", Some("AbC123"));
        assert_eq!(
            links.node_link("12:34"),
            "https://www.figma.com/file/AbC123?node-id=12%3A34"
        );
        assert_eq!(
            links.node_link("I1:2;3:4"),
            "https://www.figma.com/file/AbC123?node-id=I1%3A2%3B3%3A4"
        );
    }

    #[test]
    fn test_missing_file_key() {
        let links = LinkBuilder::default();
        assert_eq!(
            links.node_link("1:2"),
            "https://www.figma.com/file/?node-id=1%3A2"
        );
    }
}
