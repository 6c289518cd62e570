//! Depth-first traversal and aggregation of icon matches.

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{Document, Node, Page};

use super::classify::IconClassifier;
use super::enrich::{extract_colors, resolve_library};
use super::link::LinkBuilder;
use super::options::ScanOptions;
use super::record::{round_dimension, IconRecord, ScanReport, ScanStats};
use super::source::ComponentSource;

/// Parent context carried down the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentContext<'n> {
    /// Parent name
    pub name: &'n str,
    /// Parent id
    pub id: &'n str,
}

/// What the walk does after visiting a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The node is an icon; its children are not visited.
    Match(IconRecord),
    /// Not an icon; visit the children.
    Descend,
}

/// Walks pages and collects icon records.
///
/// The scanner is immutable once built: every scan keeps its own stack and
/// output, so one scanner can serve concurrent page and document scans.
pub struct Scanner<'a, S: ComponentSource + ?Sized> {
    source: &'a S,
    classifier: IconClassifier,
    links: LinkBuilder,
    options: ScanOptions,
}

impl<'a, S: ComponentSource + ?Sized> Scanner<'a, S> {
    /// Create a scanner for a file.
    ///
    /// `file_key` is only used for deep links.
    pub fn new(source: &'a S, file_key: Option<&str>, options: ScanOptions) -> Result<Self> {
        let classifier = IconClassifier::new(&options)?;
        let links = LinkBuilder::new(options.link_host.clone(), file_key);
        Ok(Self {
            source,
            classifier,
            links,
            options,
        })
    }

    /// Get the scan options.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Get the classifier.
    pub fn classifier(&self) -> &IconClassifier {
        &self.classifier
    }

    /// Scan one page. Root nodes get the page as their parent.
    pub fn scan_page(&self, page: &Page) -> Vec<IconRecord> {
        self.scan_page_with_stats(page).0
    }

    /// Scan one page and return statistics alongside the records.
    pub fn scan_page_with_stats(&self, page: &Page) -> (Vec<IconRecord>, ScanStats) {
        let mut icons = Vec::new();
        let mut stats = ScanStats::new();
        stats.add_page();

        let parent = ParentContext {
            name: &page.name,
            id: &page.id,
        };
        self.walk(&page.nodes, Some(parent), page, &mut icons, &mut stats);

        log::debug!(
            "Page '{}': {} icons in {} nodes",
            page.name,
            icons.len(),
            stats.nodes_visited
        );
        (icons, stats)
    }

    /// Scan a node subtree that lives on `page`, starting without parent context.
    pub fn scan_subtree(&self, node: &Node, page: &Page) -> Vec<IconRecord> {
        let mut icons = Vec::new();
        let mut stats = ScanStats::new();
        self.walk(std::slice::from_ref(node), None, page, &mut icons, &mut stats);
        icons
    }

    /// Scan the selected pages of a document and concatenate the results in
    /// page order.
    pub fn scan_document(&self, doc: &Document) -> Vec<IconRecord> {
        self.scan_document_with_stats(doc).0
    }

    /// Scan a document and wrap the result in a report.
    pub fn scan_report(&self, doc: &Document) -> ScanReport {
        let (icons, stats) = self.scan_document_with_stats(doc);
        ScanReport::new(doc.metadata.clone(), icons, stats)
    }

    /// Scan the selected pages of a document, with statistics.
    pub fn scan_document_with_stats(&self, doc: &Document) -> (Vec<IconRecord>, ScanStats) {
        let pages: Vec<&Page> = doc
            .pages
            .iter()
            .filter(|p| self.options.pages.includes(p))
            .collect();

        let per_page: Vec<(Vec<IconRecord>, ScanStats)> = if self.options.parallel {
            pages
                .par_iter()
                .map(|page| self.scan_page_with_stats(page))
                .collect()
        } else {
            pages
                .iter()
                .map(|page| self.scan_page_with_stats(page))
                .collect()
        };

        let mut icons = Vec::new();
        let mut stats = ScanStats::new();
        for (page_icons, page_stats) in per_page {
            icons.extend(page_icons);
            stats.merge(&page_stats);
        }
        (icons, stats)
    }

    /// Classify one node and, on a match, build its record.
    pub fn visit(
        &self,
        node: &Node,
        page: &Page,
        parent: Option<ParentContext<'_>>,
        stats: &mut ScanStats,
    ) -> Visit {
        stats.add_visit();

        let Some(reason) = self.classifier.decide(node, self.source) else {
            return Visit::Descend;
        };

        let record = self.build_record(node, page, parent, stats);
        log::debug!(
            "Matched {} '{}' on '{}' ({:?})",
            node.id,
            node.name,
            page.name,
            reason
        );
        stats.add_icon(reason, &record);
        Visit::Match(record)
    }

    fn walk<'n>(
        &self,
        roots: &'n [Node],
        parent: Option<ParentContext<'n>>,
        page: &Page,
        icons: &mut Vec<IconRecord>,
        stats: &mut ScanStats,
    ) {
        // Children are pushed in reverse so they pop in document order.
        let mut stack: Vec<(&'n Node, Option<ParentContext<'n>>)> =
            roots.iter().rev().map(|node| (node, parent)).collect();

        while let Some((node, parent)) = stack.pop() {
            match self.visit(node, page, parent, stats) {
                Visit::Match(record) => icons.push(record),
                Visit::Descend => {
                    let context = Some(ParentContext {
                        name: &node.name,
                        id: &node.id,
                    });
                    stack.extend(node.children.iter().rev().map(|child| (child, context)));
                }
            }
        }
    }

    fn build_record(
        &self,
        node: &Node,
        page: &Page,
        parent: Option<ParentContext<'_>>,
        stats: &mut ScanStats,
    ) -> IconRecord {
        let library = resolve_library(
            node,
            self.source,
            &self.links,
            self.options.resolve_library_names,
        );
        for _ in 0..library.lookup_failures {
            stats.add_lookup_failure();
        }

        let colors = self
            .options
            .extract_colors
            .then(|| extract_colors(node, self.options.max_colors));

        IconRecord {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type.as_str().to_string(),
            width: round_dimension(node.width),
            height: round_dimension(node.height),
            page: page.name.clone(),
            page_id: page.id.clone(),
            parent: parent.map(|p| p.name.to_string()),
            parent_id: parent.map(|p| p.id.to_string()),
            link: self.links.node_link(&node.id),
            library: library.library,
            linked_from: library.linked_from,
            colors,
        }
    }
}
