//! Component source abstraction layer.
//!
//! The scanner never talks to a host directly. Main-component lookups and
//! library-name lookups go through [`ComponentSource`], so a parsed file, a
//! live plugin host or a test double can all back a scan.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{Document, MainComponent, Node, NodeType};

/// Abstract interface for resolving component linkage.
///
/// Lookups may fail; callers absorb failures and degrade instead of
/// aborting a scan.
pub trait ComponentSource: Send + Sync {
    /// Resolve the main component of an instance node.
    ///
    /// `Ok(None)` means the node has no main component.
    fn main_component(&self, instance: &Node) -> Result<Option<MainComponent>>;

    /// Resolve the name of the library document that publishes a component key.
    fn library_name(&self, component_key: &str) -> Result<Option<String>> {
        let _ = component_key;
        Ok(None)
    }
}

impl ComponentSource for Document {
    fn main_component(&self, instance: &Node) -> Result<Option<MainComponent>> {
        if instance.node_type != NodeType::Instance {
            return Ok(None);
        }
        let Some(ref component_id) = instance.component_id else {
            return Ok(None);
        };
        self.component_by_id(component_id)
            .map(Some)
            .ok_or_else(|| Error::UnresolvedComponent(component_id.clone()))
    }
}

/// Outcome of the two-step main-component resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The source answered.
    Resolved(T),
    /// The source failed; the node's cached reference was used.
    Cached(T),
    /// Nothing is known.
    Absent,
}

impl<T> Resolution<T> {
    /// Get the resolved value, whichever step produced it.
    pub fn into_option(self) -> Option<T> {
        match self {
            Resolution::Resolved(v) | Resolution::Cached(v) => Some(v),
            Resolution::Absent => None,
        }
    }

    /// Check if a value was found.
    pub fn is_found(&self) -> bool {
        !matches!(self, Resolution::Absent)
    }

    /// Check if the value came from the cached reference.
    pub fn is_cached(&self) -> bool {
        matches!(self, Resolution::Cached(_))
    }
}

/// Resolve an instance's main component: ask the source, fall back to the
/// node's cached reference on failure, else report it absent.
pub fn resolve_main_component<S>(source: &S, node: &Node) -> Resolution<MainComponent>
where
    S: ComponentSource + ?Sized,
{
    match source.main_component(node) {
        Ok(Some(main)) => Resolution::Resolved(main),
        Ok(None) => Resolution::Absent,
        Err(e) => {
            log::warn!("Main component lookup failed for {}: {}", node.id, e);
            match node.main_component {
                Some(ref cached) => Resolution::Cached(cached.clone()),
                None => Resolution::Absent,
            }
        }
    }
}

/// Map from published component key to library document name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryCatalog {
    names: HashMap<String, String>,
}

impl LibraryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON object of `{ "<component key>": "<library name>" }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let names: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { names })
    }

    /// Load a catalog from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the catalog as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.names)?)
    }

    /// Record the library name for a component key.
    pub fn insert(&mut self, component_key: impl Into<String>, library: impl Into<String>) {
        self.names.insert(component_key.into(), library.into());
    }

    /// Get the library name for a component key.
    pub fn get(&self, component_key: &str) -> Option<&str> {
        self.names.get(component_key).map(String::as_str)
    }

    /// Number of known keys.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A component source with library names layered on top.
pub struct WithLibraries<'a, S: ComponentSource + ?Sized> {
    inner: &'a S,
    catalog: &'a LibraryCatalog,
}

impl<'a, S: ComponentSource + ?Sized> WithLibraries<'a, S> {
    /// Wrap `inner`, answering library-name lookups from `catalog` first.
    pub fn new(inner: &'a S, catalog: &'a LibraryCatalog) -> Self {
        Self { inner, catalog }
    }
}

impl<S: ComponentSource + ?Sized> ComponentSource for WithLibraries<'_, S> {
    fn main_component(&self, instance: &Node) -> Result<Option<MainComponent>> {
        self.inner.main_component(instance)
    }

    fn library_name(&self, component_key: &str) -> Result<Option<String>> {
        match self.catalog.get(component_key) {
            Some(name) => Ok(Some(name.to_string())),
            None => self.inner.library_name(component_key),
        }
    }
}
