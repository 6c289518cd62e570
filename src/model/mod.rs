//! Document model types for design documents.
//!
//! This module defines the read-only view of a host document that the
//! scanner works on: a document is an ordered list of pages, a page an
//! ordered list of node trees. The model is independent of the input
//! format; the parser fills it from Figma JSON.

mod document;
mod node;
mod page;

pub use document::{ComponentMeta, Document, Metadata, NodeLocation};
pub use node::{Color, MainComponent, Node, NodeType, Paint, PaintType};
pub use page::Page;
