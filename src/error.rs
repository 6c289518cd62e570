//! Error types for iconscan library.

use std::io;
use thiserror::Error;

/// Result type alias for iconscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading and scanning documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is JSON but not a Figma document.
    #[error("Unknown input format: not a Figma document")]
    UnknownFormat,

    /// A node in the document tree is malformed.
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// No page with the given id or name exists.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// An instance points at a main component that cannot be found.
    #[error("Unresolved main component: {0}")]
    UnresolvedComponent(String),

    /// A user-supplied name pattern failed to compile.
    #[error("Invalid name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// An external lookup (component or library) failed.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}
