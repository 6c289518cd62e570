//! Figma JSON parsing module.

mod figma_parser;
mod options;

pub use figma_parser::FigmaParser;
pub use options::{ErrorMode, ParseOptions};
