//! Parsing options and configuration.

use crate::scan::PageSelection;

/// Options for parsing Figma documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to keep)
    pub pages: PageSelection,

    /// File key for deep links, when the input does not carry one
    pub file_key: Option<String>,

    /// Keep nodes marked `visible: false`
    pub include_hidden: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip malformed nodes).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the file key.
    pub fn with_file_key(mut self, key: impl Into<String>) -> Self {
        self.file_key = Some(key.into());
        self
    }

    /// Keep or drop hidden nodes.
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
            file_key: None,
            include_hidden: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any malformed node
    #[default]
    Strict,
    /// Skip malformed nodes and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .with_file_key("AbC")
            .with_hidden(false)
            .with_pages(PageSelection::Pages(vec![2]));

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.file_key.as_deref(), Some("AbC"));
        assert!(!options.include_hidden);
        assert!(matches!(options.pages, PageSelection::Pages(_)));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.include_hidden);
        assert!(options.file_key.is_none());
    }
}
