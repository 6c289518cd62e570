//! Input format detection and validation.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Kind of Figma JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Full `GET /v1/files/:key` response with `document` and `components`
    FileResponse,
    /// Bare DOCUMENT node
    DocumentNode,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::FileResponse => write!(f, "Figma file response"),
            InputFormat::DocumentNode => write!(f, "Figma document node"),
        }
    }
}

const DOCUMENT_TYPE: &str = "DOCUMENT";

/// Detect the input format of a JSON file.
///
/// # Example
/// ```no_run
/// use iconscan::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("design.json").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let data = fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect the input format of JSON bytes.
///
/// # Returns
/// * `Err(Error::UnknownFormat)` if the data is not a JSON object
/// * `Err(Error::Json)` if it looks like JSON but fails to parse
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if !looks_like_object(data) {
        return Err(Error::UnknownFormat);
    }

    let value: Value = serde_json::from_slice(data)?;
    detect_format_from_value(&value)
}

/// Cheap check for a JSON object before paying for a full parse.
pub(crate) fn looks_like_object(data: &[u8]) -> bool {
    data.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{')
}

/// Detect the input format of an already parsed JSON value.
pub fn detect_format_from_value(value: &Value) -> Result<InputFormat> {
    let is_document = |v: &Value| v.get("type").and_then(Value::as_str) == Some(DOCUMENT_TYPE);

    if value.get("document").is_some_and(is_document) {
        Ok(InputFormat::FileResponse)
    } else if is_document(value) {
        Ok(InputFormat::DocumentNode)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if a file holds a Figma document.
pub fn is_figma_json<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes hold a Figma document.
pub fn is_figma_json_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
