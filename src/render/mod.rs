//! Rendering module for converting scan reports to output formats.

mod json;
mod markdown;
mod options;
mod text;

pub use json::{icons_to_json, to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{Grouping, RenderOptions, UNGROUPED};
pub use text::to_text;
