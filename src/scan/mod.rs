//! Icon scanning: classification, traversal and enrichment.
//!
//! The [`Scanner`] walks pages depth-first. Every node is handed to the
//! [`IconClassifier`]; a match becomes an [`IconRecord`] and its subtree is
//! not visited again, so nested shapes inside an icon are never reported as
//! icons of their own.

mod classify;
mod enrich;
mod link;
mod options;
mod record;
mod source;
mod traverse;

pub use classify::{IconClassifier, MatchReason, ICON_NAME_PATTERNS, MAX_VECTOR_CHILDREN};
pub use enrich::{extract_colors, resolve_library, LibraryInfo};
pub use link::LinkBuilder;
pub use options::{
    ClassifierRules, PageSelection, ScanOptions, SizeGate, DEFAULT_LINK_HOST, DEFAULT_MAX_COLORS,
};
pub use record::{
    IconRecord, LinkedComponent, ScanReport, ScanStats, EXTERNAL_LIBRARY, LOCAL_COMPONENTS,
};
pub use source::{
    resolve_main_component, ComponentSource, LibraryCatalog, Resolution, WithLibraries,
};
pub use traverse::{ParentContext, Scanner, Visit};
