//! # iconscan
//!
//! Heuristic icon detection for Figma documents.
//!
//! This library walks a design document, classifies nodes as icons using
//! naming conventions, size and aspect ratio, node type, vector-only
//! composition and remote-library membership, and reports each match with
//! its size, page, parent, deep link, library and colors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use iconscan::{parse_file, render, ScanOptions};
//!
//! fn main() -> iconscan::Result<()> {
//!     // Parse a Figma file response
//!     let doc = parse_file("design.json")?;
//!
//!     // Scan every page
//!     let report = iconscan::scan_document(&doc, ScanOptions::default())?;
//!
//!     // Render as Markdown
//!     let markdown = render::to_markdown(&report, &render::RenderOptions::default())?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Four classifier rules**: name patterns, small components, remote
//!   library instances, vector-only containers
//! - **No nested matches**: a matched node's subtree is never revisited
//! - **Tolerant lookups**: failed component lookups degrade to cached data
//! - **Multiple output formats**: Markdown, plain text, JSON
//! - **Parallel processing**: optional page-level fan-out with Rayon
//! - **Host navigation**: select and reveal matches through a `Viewport`

pub mod detect;
pub mod error;
pub mod model;
pub mod navigate;
pub mod parser;
pub mod protocol;
pub mod render;
pub mod scan;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_figma_json, InputFormat};
pub use error::{Error, Result};
pub use model::{
    Color, ComponentMeta, Document, MainComponent, Metadata, Node, NodeType, Paint, PaintType,
    Page,
};
pub use navigate::{select_node, select_nodes, Notice, RecordingViewport, Selection, Viewport};
pub use parser::{ErrorMode, FigmaParser, ParseOptions};
pub use protocol::{handle_request, Request, Response};
pub use render::{Grouping, JsonFormat, RenderOptions};
pub use scan::{
    ClassifierRules, ComponentSource, IconClassifier, IconRecord, LibraryCatalog, LinkedComponent,
    PageSelection, ScanOptions, ScanReport, ScanStats, Scanner, SizeGate, WithLibraries,
};

use std::io::Read;
use std::path::Path;

/// Parse a Figma JSON file and return a structured document.
///
/// # Arguments
///
/// * `path` - Path to a `GET /v1/files/:key` response or a bare DOCUMENT node
///
/// # Example
///
/// ```no_run
/// use iconscan::parse_file;
///
/// let doc = parse_file("design.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = FigmaParser::open(path)?;
    parser.parse()
}

/// Parse a Figma JSON file with custom options.
///
/// # Example
///
/// ```no_run
/// use iconscan::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .lenient()
///     .with_file_key("AbC123");
/// let doc = parse_file_with_options("design.json", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = FigmaParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse Figma JSON from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = FigmaParser::from_bytes(data)?;
    parser.parse()
}

/// Parse Figma JSON from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = FigmaParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse Figma JSON from a reader.
///
/// # Example
///
/// ```no_run
/// use iconscan::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("design.json").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = FigmaParser::from_reader(reader)?;
    parser.parse()
}

/// Parse Figma JSON from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = FigmaParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Scan a parsed document, using the document itself as component source.
///
/// # Example
///
/// ```no_run
/// use iconscan::{parse_file, scan_document, ScanOptions};
///
/// let doc = parse_file("design.json").unwrap();
/// let report = scan_document(&doc, ScanOptions::default()).unwrap();
/// for icon in &report.icons {
///     println!("{} {}", icon.name, icon.link);
/// }
/// ```
pub fn scan_document(doc: &Document, options: ScanOptions) -> Result<ScanReport> {
    let scanner = Scanner::new(doc, doc.metadata.file_key.as_deref(), options)?;
    Ok(scanner.scan_report(doc))
}

/// Scan one page of a parsed document.
pub fn scan_page(doc: &Document, page: &Page, options: ScanOptions) -> Result<Vec<IconRecord>> {
    let scanner = Scanner::new(doc, doc.metadata.file_key.as_deref(), options)?;
    Ok(scanner.scan_page(page))
}

/// Parse and scan a Figma JSON file with default options.
///
/// # Example
///
/// ```no_run
/// use iconscan::scan_file;
///
/// let report = scan_file("design.json").unwrap();
/// println!("{} icons", report.len());
/// ```
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<ScanReport> {
    let doc = parse_file(path)?;
    scan_document(&doc, ScanOptions::default())
}

/// Scan a Figma JSON file and render the result as Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let report = scan_file(path)?;
    render::to_markdown(&report, &RenderOptions::default())
}

/// Scan a Figma JSON file and render the result as plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let report = scan_file(path)?;
    render::to_text(&report, options)
}

/// Scan a Figma JSON file and render the result as JSON.
///
/// # Example
///
/// ```no_run
/// use iconscan::{to_json, JsonFormat};
///
/// let json = to_json("design.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("icons.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let report = scan_file(path)?;
    render::to_json(&report, format)
}

/// Parse a Figma JSON file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_async_with_options(path, ParseOptions::default()).await
}

/// Parse a Figma JSON file with custom options without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn parse_file_async_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<Document> {
    let data = tokio::fs::read(path).await?;
    parse_bytes_with_options(&data, options)
}

/// Parse and scan a Figma JSON file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn scan_file_async<P: AsRef<Path>>(path: P, options: ScanOptions) -> Result<ScanReport> {
    let doc = parse_file_async(path).await?;
    scan_document(&doc, options)
}

/// Builder for parsing, scanning and rendering Figma documents.
///
/// # Example
///
/// ```no_run
/// use iconscan::{Grouping, IconScan};
///
/// let markdown = IconScan::new()
///     .lenient()
///     .with_file_key("AbC123")
///     .with_grouping(Grouping::Library)
///     .with_frontmatter()
///     .scan("design.json")?
///     .to_markdown()?;
/// # Ok::<(), iconscan::Error>(())
/// ```
pub struct IconScan {
    parse_options: ParseOptions,
    scan_options: ScanOptions,
    render_options: RenderOptions,
    catalog: Option<LibraryCatalog>,
}

impl IconScan {
    /// Create a new IconScan builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            scan_options: ScanOptions::default(),
            render_options: RenderOptions::default(),
            catalog: None,
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set the file key used in deep links.
    pub fn with_file_key(mut self, key: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_file_key(key);
        self
    }

    /// Drop hidden nodes while parsing.
    pub fn skip_hidden(mut self) -> Self {
        self.parse_options = self.parse_options.with_hidden(false);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set scan options.
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// Add a name pattern to the classifier.
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.scan_options = self.scan_options.with_name_pattern(pattern);
        self
    }

    /// Enable or disable color extraction.
    pub fn with_colors(mut self, extract: bool) -> Self {
        self.scan_options = self.scan_options.with_colors(extract);
        self.render_options = self.render_options.with_colors(extract);
        self
    }

    /// Resolve library names from a catalog.
    pub fn with_catalog(mut self, catalog: LibraryCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Scan pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.scan_options = self.scan_options.with_parallel(true);
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set output grouping.
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.render_options = self.render_options.with_grouping(grouping);
        self
    }

    /// Parse and scan a Figma JSON file.
    pub fn scan<P: AsRef<Path>>(self, path: P) -> Result<IconScanResult> {
        let parser = FigmaParser::open_with_options(path, self.parse_options.clone())?;
        let document = parser.parse()?;
        self.finish(document)
    }

    /// Parse and scan Figma JSON bytes.
    pub fn scan_bytes(self, data: &[u8]) -> Result<IconScanResult> {
        let parser = FigmaParser::from_bytes_with_options(data, self.parse_options.clone())?;
        let document = parser.parse()?;
        self.finish(document)
    }

    /// Scan an already parsed document.
    pub fn scan_document(self, document: Document) -> Result<IconScanResult> {
        self.finish(document)
    }

    fn finish(self, document: Document) -> Result<IconScanResult> {
        let file_key = document.metadata.file_key.as_deref();
        let report = match self.catalog {
            Some(ref catalog) => {
                let source = WithLibraries::new(&document, catalog);
                Scanner::new(&source, file_key, self.scan_options)?.scan_report(&document)
            }
            None => Scanner::new(&document, file_key, self.scan_options)?.scan_report(&document),
        };

        Ok(IconScanResult {
            document,
            report,
            render_options: self.render_options,
        })
    }
}

impl Default for IconScan {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of scanning a document.
pub struct IconScanResult {
    /// The parsed document
    pub document: Document,
    /// The scan report
    pub report: ScanReport,
    /// Render options to use
    render_options: RenderOptions,
}

impl IconScanResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.report, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.report, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.report, format)
    }

    /// Icons in scan order.
    pub fn icons(&self) -> &[IconRecord] {
        &self.report.icons
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "name": "Kit",
        "document": {"id": "0:0", "type": "DOCUMENT", "children": [
            {"id": "0:1", "name": "Icons", "type": "CANVAS", "children": [
                {"id": "1:1", "name": "home", "type": "INSTANCE", "componentId": "9:1",
                 "absoluteBoundingBox": {"width": 24, "height": 24}}
            ]}
        ]},
        "components": {"9:1": {"key": "k-home", "name": "home", "remote": true}}
    }"#;

    #[test]
    fn test_iconscan_builder() {
        let builder = IconScan::new()
            .lenient()
            .with_frontmatter()
            .with_grouping(Grouping::Page)
            .parallel();

        assert_eq!(builder.parse_options.error_mode, ErrorMode::Lenient);
        assert!(builder.render_options.include_frontmatter);
        assert_eq!(builder.render_options.group_by, Grouping::Page);
        assert!(builder.scan_options.parallel);
    }

    #[test]
    fn test_iconscan_builder_default() {
        let builder = IconScan::default();
        assert!(!builder.render_options.include_frontmatter);
        assert!(builder.catalog.is_none());
    }

    #[test]
    fn test_iconscan_with_catalog() {
        let mut catalog = LibraryCatalog::new();
        catalog.insert("k-home", "Material Icons");

        let result = IconScan::new()
            .with_file_key("KEY")
            .with_catalog(catalog)
            .scan_bytes(DOC.as_bytes())
            .unwrap();

        let icon = &result.icons()[0];
        assert_eq!(icon.library.as_deref(), Some("Material Icons"));
        assert_eq!(icon.link, "https://www.figma.com/file/KEY?node-id=1%3A1");
        assert!(result.to_markdown().unwrap().contains("Material Icons"));
    }

    #[test]
    fn test_scan_document_without_catalog() {
        let doc = parse_bytes(DOC.as_bytes()).unwrap();
        let report = scan_document(&doc, ScanOptions::default()).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.icons[0].library.as_deref(), Some("External Library"));
        assert_eq!(report.stats.page_count, 1);
    }

    #[test]
    fn test_parse_bytes_invalid() {
        assert!(parse_bytes(b"").is_err());
        assert!(parse_bytes(b"%PDF-1.7").is_err());
        assert!(matches!(
            parse_bytes(br#"{"name":"x"}"#),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_scan_with_invalid_pattern() {
        let doc = parse_bytes(DOC.as_bytes()).unwrap();
        let result = scan_document(&doc, ScanOptions::default().with_name_pattern("[unclosed"));
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }
}
