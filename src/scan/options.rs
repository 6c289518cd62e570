//! Scan options and configuration.

use std::ops::RangeInclusive;

use crate::model::Page;

/// Default cap on extracted colors per icon.
pub const DEFAULT_MAX_COLORS: usize = 5;

/// Default host used in deep links.
pub const DEFAULT_LINK_HOST: &str = "www.figma.com";

/// Options for scanning documents for icons.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Which classifier rules are active
    pub rules: ClassifierRules,

    /// Size/aspect-ratio gate used by the size-based rules
    pub size_gate: SizeGate,

    /// Additional case-insensitive name patterns (regex syntax)
    pub extra_name_patterns: Vec<String>,

    /// Collect solid colors for each icon
    pub extract_colors: bool,

    /// Maximum number of colors per icon
    pub max_colors: usize,

    /// Ask the component source for library document names
    pub resolve_library_names: bool,

    /// Host used when building deep links
    pub link_host: String,

    /// Page selection for document scans
    pub pages: PageSelection,

    /// Scan pages on the rayon pool (output order is unchanged)
    pub parallel: bool,
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set classifier rules.
    pub fn with_rules(mut self, rules: ClassifierRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the size gate.
    pub fn with_size_gate(mut self, gate: SizeGate) -> Self {
        self.size_gate = gate;
        self
    }

    /// Add an extra name pattern.
    pub fn with_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.extra_name_patterns.push(pattern.into());
        self
    }

    /// Enable or disable color extraction.
    pub fn with_colors(mut self, extract: bool) -> Self {
        self.extract_colors = extract;
        self
    }

    /// Set the color cap.
    pub fn with_max_colors(mut self, max: usize) -> Self {
        self.max_colors = max;
        self
    }

    /// Enable or disable library name resolution.
    pub fn with_library_names(mut self, resolve: bool) -> Self {
        self.resolve_library_names = resolve;
        self
    }

    /// Set the deep-link host.
    pub fn with_link_host(mut self, host: impl Into<String>) -> Self {
        self.link_host = host.into();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel page scanning.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page scanning.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            rules: ClassifierRules::default(),
            size_gate: SizeGate::default(),
            extra_name_patterns: Vec::new(),
            extract_colors: true,
            max_colors: DEFAULT_MAX_COLORS,
            resolve_library_names: true,
            link_host: DEFAULT_LINK_HOST.to_string(),
            pages: PageSelection::All,
            parallel: false,
        }
    }
}

/// Toggles for the individual classifier rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierRules {
    /// Name matches an icon naming convention
    pub name_patterns: bool,

    /// Small component, component set or instance
    pub small_components: bool,

    /// Small instance of a remote library component
    pub remote_instances: bool,

    /// Small frame/group holding only vector-like children
    pub vector_containers: bool,
}

impl ClassifierRules {
    /// All rules enabled.
    pub fn all() -> Self {
        Self {
            name_patterns: true,
            small_components: true,
            remote_instances: true,
            vector_containers: true,
        }
    }

    /// Only the naming rule.
    pub fn names_only() -> Self {
        Self {
            name_patterns: true,
            small_components: false,
            remote_instances: false,
            vector_containers: false,
        }
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::all()
    }
}

/// The "small and squarish" numeric gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeGate {
    /// Minimum width and height (inclusive)
    pub min_size: f64,

    /// Maximum width and height (inclusive)
    pub max_size: f64,

    /// Minimum width/height ratio (inclusive)
    pub min_ratio: f64,

    /// Maximum width/height ratio (inclusive)
    pub max_ratio: f64,
}

impl SizeGate {
    /// Check whether a width/height pair is small and squarish.
    ///
    /// Non-finite values and a non-positive height fail the test.
    pub fn admits(&self, width: f64, height: f64) -> bool {
        if !width.is_finite() || !height.is_finite() || height <= 0.0 {
            return false;
        }
        let in_range = |v: f64| v >= self.min_size && v <= self.max_size;
        if !in_range(width) || !in_range(height) {
            return false;
        }
        let ratio = width / height;
        ratio >= self.min_ratio && ratio <= self.max_ratio
    }
}

impl Default for SizeGate {
    fn default() -> Self {
        Self {
            min_size: 8.0,
            max_size: 200.0,
            min_ratio: 0.5,
            max_ratio: 2.0,
        }
    }
}

/// Page selection for scanning and parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
    /// Several ranges (inclusive, 1-indexed, sorted and non-overlapping)
    Ranges(Vec<RangeInclusive<u32>>),
    /// Pages matched by name or id
    Named(Vec<String>),
}

impl PageSelection {
    /// Check if a page should be included.
    pub fn includes(&self, page: &Page) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page.index),
            PageSelection::Pages(pages) => pages.contains(&page.index),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page.index)),
            PageSelection::Named(names) => names.iter().any(|n| *n == page.name || *n == page.id),
        }
    }

    /// Parse a page selection string (e.g., "1-3", "1,3,5-7", "Icons,Components").
    ///
    /// Anything that is not a list of page numbers is treated as a list of
    /// page names or ids.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        match parse_numbers(s) {
            Some(Ok(selection)) => Ok(selection),
            Some(Err(e)) => Err(e),
            None => {
                let names: Vec<String> = s.split(',').map(|n| n.trim().to_string()).collect();
                if names.iter().any(|n| n.is_empty()) {
                    return Err(format!("Empty page name in '{}'", s));
                }
                Ok(PageSelection::Named(names))
            }
        }
    }
}

/// Parse a numeric selection; `None` when the input is not numeric at all.
fn parse_numbers(s: &str) -> Option<Result<PageSelection, String>> {
    let parse_part = |part: &str| -> Option<(u32, u32)> {
        let part = part.trim();
        match part.split_once('-') {
            Some((start, end)) => Some((start.trim().parse().ok()?, end.trim().parse().ok()?)),
            None => {
                let p = part.parse().ok()?;
                Some((p, p))
            }
        }
    };

    let mut parts = Vec::new();
    for part in s.split(',') {
        parts.push(parse_part(part)?);
    }

    if let Some(&(start, end)) = parts.iter().find(|(start, end)| start > end || *start == 0) {
        return Some(Err(format!("Invalid page range: {}-{}", start, end)));
    }

    // Simple range (e.g., "1-10")
    if parts.len() == 1 && s.contains('-') {
        let (start, end) = parts[0];
        return Some(Ok(PageSelection::Range(start..=end)));
    }

    if parts.iter().all(|(start, end)| start == end) {
        let mut pages: Vec<u32> = parts.into_iter().map(|(p, _)| p).collect();
        pages.sort_unstable();
        pages.dedup();
        return Some(Ok(PageSelection::Pages(pages)));
    }

    // Mixed lists stay as sorted, merged bounds.
    parts.sort_unstable();
    let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
    for (start, end) in parts {
        match ranges.last_mut() {
            Some(last) if start <= last.end().saturating_add(1) => {
                if end > *last.end() {
                    *last = *last.start()..=end;
                }
            }
            _ => ranges.push(start..=end),
        }
    }
    Some(Ok(PageSelection::Ranges(ranges)))
}
