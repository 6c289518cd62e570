//! Figma document parser over `serde_json`.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::detect::{detect_format_from_value, looks_like_object, InputFormat};
use crate::error::{Error, Result};
use crate::model::{ComponentMeta, Document, MainComponent, Metadata, Node, NodeType, Paint, Page};

use super::options::{ErrorMode, ParseOptions};

/// Figma JSON parser.
pub struct FigmaParser {
    value: Value,
    format: InputFormat,
    options: ParseOptions,
}

/// Component table entry as it appears in a file response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawComponent {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    remote: bool,
    #[serde(default)]
    component_set_id: Option<String>,
}

impl From<RawComponent> for ComponentMeta {
    fn from(raw: RawComponent) -> Self {
        Self {
            key: raw.key.filter(|k| !k.is_empty()),
            name: raw.name,
            description: raw.description,
            remote: raw.remote,
            component_set_id: raw.component_set_id,
        }
    }
}

impl FigmaParser {
    /// Open a Figma JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a Figma JSON file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse Figma JSON from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse Figma JSON from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        if !looks_like_object(data) {
            return Err(Error::UnknownFormat);
        }
        let value: Value = serde_json::from_slice(data)?;
        Self::from_value(value, options)
    }

    /// Parse Figma JSON from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse Figma JSON from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Wrap an already decoded JSON value.
    pub fn from_value(value: Value, options: ParseOptions) -> Result<Self> {
        let format = detect_format_from_value(&value)?;
        Ok(Self {
            value,
            format,
            options,
        })
    }

    /// Get the detected input format.
    pub fn format(&self) -> InputFormat {
        self.format
    }

    /// Number of pages in the input, ignoring page selection.
    pub fn page_count(&self) -> u32 {
        self.canvases().count() as u32
    }

    /// Parse the input and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();

        if self.format == InputFormat::FileResponse {
            document.components = self.component_table("components")?;
            document.component_sets = self.component_table("componentSets")?;
        }
        document.metadata = self.extract_metadata(&document);

        for (index, canvas) in self.canvases().enumerate() {
            let index = index as u32 + 1;
            let Some(page) = self.page_shell(canvas, index)? else {
                continue;
            };

            if !self.options.pages.includes(&page) {
                log::debug!("Skipping page {} '{}'", index, page.name);
                continue;
            }

            let page = self.parse_page(canvas, page, &document.components)?;
            document.add_page(page);
        }

        Ok(document)
    }

    fn root(&self) -> &Value {
        match self.format {
            InputFormat::FileResponse => &self.value["document"],
            InputFormat::DocumentNode => &self.value,
        }
    }

    fn canvases(&self) -> impl Iterator<Item = &Value> {
        self.root()
            .get("children")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|child| {
                child
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| NodeType::parse(t) == NodeType::Canvas)
            })
    }

    fn extract_metadata(&self, document: &Document) -> Metadata {
        let (name, last_modified, version, editor_type) = match self.format {
            InputFormat::FileResponse => (
                str_field(&self.value, "name"),
                self.value
                    .get("lastModified")
                    .and_then(Value::as_str)
                    .and_then(parse_timestamp),
                opt_str_field(&self.value, "version"),
                opt_str_field(&self.value, "editorType"),
            ),
            InputFormat::DocumentNode => (str_field(&self.value, "name"), None, None, None),
        };

        Metadata {
            name,
            file_key: self.options.file_key.clone(),
            last_modified,
            version,
            editor_type,
            page_count: self.page_count(),
            component_count: document.components.len() as u32,
        }
    }

    fn component_table(&self, field: &str) -> Result<HashMap<String, ComponentMeta>> {
        let Some(table) = self.value.get(field) else {
            return Ok(HashMap::new());
        };

        let raw: HashMap<String, RawComponent> = match serde_json::from_value(table.clone()) {
            Ok(raw) => raw,
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Ignoring malformed '{}' table: {}", field, e);
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(raw.into_iter().map(|(id, c)| (id, c.into())).collect())
    }

    fn page_shell(&self, canvas: &Value, index: u32) -> Result<Option<Page>> {
        match canvas.get("id").and_then(Value::as_str) {
            Some(id) => Ok(Some(Page::new(id, str_field(canvas, "name"), index))),
            None => self.malformed(format!("page {} has no id", index)).map(|_| None),
        }
    }

    fn parse_page(
        &self,
        canvas: &Value,
        mut page: Page,
        components: &HashMap<String, ComponentMeta>,
    ) -> Result<Page> {
        for child in children_of(canvas) {
            if let Some(node) = self.parse_node(child, components)? {
                page.add_node(node);
            }
        }
        Ok(page)
    }

    /// Convert one JSON node. `Ok(None)` means the node was dropped.
    fn parse_node(
        &self,
        value: &Value,
        components: &HashMap<String, ComponentMeta>,
    ) -> Result<Option<Node>> {
        let Some(id) = value.get("id").and_then(Value::as_str) else {
            return self.malformed("node without id".to_string()).map(|_| None);
        };
        let Some(node_type) = value.get("type").and_then(Value::as_str) else {
            return self
                .malformed(format!("node {} has no type", id))
                .map(|_| None);
        };

        let visible = value.get("visible").and_then(Value::as_bool).unwrap_or(true);
        if !visible && !self.options.include_hidden {
            return Ok(None);
        }

        let (width, height) = geometry(value);
        let mut node = Node::new(
            id,
            str_field(value, "name"),
            NodeType::parse(node_type),
            width,
            height,
        );
        node.visible = visible;
        node.fills = self.paints(value, "fills", id)?;
        node.strokes = self.paints(value, "strokes", id)?;

        if let Some(component_id) = value.get("componentId").and_then(Value::as_str) {
            node.component_id = Some(component_id.to_string());
            node.main_component = components.get(component_id).map(|meta| MainComponent {
                id: component_id.to_string(),
                name: meta.name.clone(),
                key: meta.key.clone(),
                remote: meta.remote,
            });
        }

        for child in children_of(value) {
            if let Some(child) = self.parse_node(child, components)? {
                node.children.push(child);
            }
        }

        Ok(Some(node))
    }

    fn paints(&self, value: &Value, field: &str, id: &str) -> Result<Vec<Paint>> {
        let Some(paints) = value.get(field) else {
            return Ok(Vec::new());
        };
        match serde_json::from_value(paints.clone()) {
            Ok(paints) => Ok(paints),
            Err(e) => self
                .malformed(format!("node {} has invalid {}: {}", id, field, e))
                .map(|_| Vec::new()),
        }
    }

    /// Fail in strict mode, warn and carry on in lenient mode.
    fn malformed(&self, message: String) -> Result<()> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(Error::InvalidNode(message)),
            ErrorMode::Lenient => {
                log::warn!("Skipping malformed content: {}", message);
                Ok(())
            }
        }
    }
}

fn children_of(value: &Value) -> impl Iterator<Item = &Value> {
    value
        .get("children")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn str_field(value: &Value, field: &str) -> String {
    opt_str_field(value, field).unwrap_or_default()
}

fn opt_str_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Width and height from `absoluteBoundingBox`, falling back to `size`.
fn geometry(value: &Value) -> (f64, f64) {
    let dim = |obj: &Value, key: &str| obj.get(key).and_then(Value::as_f64);

    if let Some(bbox) = value.get("absoluteBoundingBox").filter(|b| b.is_object()) {
        if let (Some(w), Some(h)) = (dim(bbox, "width"), dim(bbox, "height")) {
            return (w, h);
        }
    }
    if let Some(size) = value.get("size").filter(|s| s.is_object()) {
        if let (Some(w), Some(h)) = (dim(size, "x"), dim(size, "y")) {
            return (w, h);
        }
    }
    (0.0, 0.0)
}

/// Parse an RFC 3339 timestamp such as `2024-05-01T10:20:30Z`.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::PageSelection;
    use chrono::Datelike;

    const FILE: &str = r#"{
        "name": "Design Kit",
        "lastModified": "2024-05-01T10:20:30Z",
        "version": "123",
        "editorType": "figma",
        "document": {
            "id": "0:0", "name": "Document", "type": "DOCUMENT",
            "children": [
                {
                    "id": "0:1", "name": "Icons", "type": "CANVAS",
                    "children": [
                        {
                            "id": "1:1", "name": "home", "type": "INSTANCE",
                            "componentId": "9:1",
                            "absoluteBoundingBox": {"x": 0, "y": 0, "width": 24, "height": 24},
                            "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0, "a": 1}}]
                        },
                        {
                            "id": "1:2", "name": "Hidden", "type": "FRAME", "visible": false,
                            "size": {"x": 10, "y": 10}
                        }
                    ]
                },
                {"id": "0:2", "name": "Archive", "type": "CANVAS", "children": []}
            ]
        },
        "components": {
            "9:1": {"key": "abc", "name": "home", "description": "", "remote": true}
        },
        "componentSets": {}
    }"#;

    #[test]
    fn test_parse_file_response() {
        let parser = FigmaParser::from_bytes(FILE.as_bytes()).unwrap();
        assert_eq!(parser.format(), InputFormat::FileResponse);
        assert_eq!(parser.page_count(), 2);

        let doc = parser.parse().unwrap();
        assert_eq!(doc.metadata.name, "Design Kit");
        assert_eq!(doc.metadata.version.as_deref(), Some("123"));
        assert_eq!(doc.metadata.last_modified.unwrap().year(), 2024);
        assert_eq!(doc.metadata.component_count, 1);
        assert_eq!(doc.page_count(), 2);

        let icons = &doc.pages[0];
        assert_eq!(icons.nodes.len(), 2);
        let home = &icons.nodes[0];
        assert_eq!(home.node_type, NodeType::Instance);
        assert_eq!(home.width, 24.0);
        assert_eq!(home.fills.len(), 1);
        let main = home.main_component.as_ref().unwrap();
        assert!(main.remote);
        assert_eq!(main.key.as_deref(), Some("abc"));

        let hidden = &icons.nodes[1];
        assert!(!hidden.visible);
        assert_eq!((hidden.width, hidden.height), (10.0, 10.0));
    }

    #[test]
    fn test_drop_hidden_and_select_pages() {
        let options = ParseOptions::new()
            .with_hidden(false)
            .with_pages(PageSelection::Named(vec!["Icons".into()]))
            .with_file_key("KEY");
        let doc = FigmaParser::from_bytes_with_options(FILE.as_bytes(), options)
            .unwrap()
            .parse()
            .unwrap();

        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.metadata.page_count, 2);
        assert_eq!(doc.pages[0].nodes.len(), 1);
        assert_eq!(doc.metadata.file_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn test_document_node_input() {
        let json = r#"{"id":"0:0","name":"Doc","type":"DOCUMENT","children":[
            {"id":"0:1","name":"Page 1","type":"CANVAS","children":[]}]}"#;
        let parser = FigmaParser::from_bytes(json.as_bytes()).unwrap();
        assert_eq!(parser.format(), InputFormat::DocumentNode);
        let doc = parser.parse().unwrap();
        assert_eq!(doc.metadata.name, "Doc");
        assert_eq!(doc.pages[0].name, "Page 1");
        assert!(doc.components.is_empty());
    }

    #[test]
    fn test_strict_and_lenient_malformed_node() {
        let json = r#"{"type":"DOCUMENT","children":[
            {"id":"0:1","name":"P","type":"CANVAS","children":[
                {"name":"no id","type":"FRAME"},
                {"id":"1:2","name":"ok","type":"VECTOR","fills":"oops"}
            ]}]}"#;

        let err = FigmaParser::from_bytes(json.as_bytes())
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNode(_)));

        let doc = FigmaParser::from_bytes_with_options(json.as_bytes(), ParseOptions::new().lenient())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(doc.pages[0].nodes.len(), 1);
        assert!(doc.pages[0].nodes[0].fills.is_empty());
    }

    #[test]
    fn test_not_a_figma_document() {
        assert!(matches!(
            FigmaParser::from_bytes(b"not json"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(
            FigmaParser::from_bytes(br#"{"hello":"world"}"#),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_parse_timestamp() {
        let dt = parse_timestamp("2023-01-15T14:30:00.000Z").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 1);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
