//! Rendering options and configuration.

use crate::scan::IconRecord;

/// Group label for icons without a library classification.
pub const UNGROUPED: &str = "Other";

/// Options for rendering scan reports.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with document metadata (Markdown only)
    pub include_frontmatter: bool,

    /// How icons are grouped in the output
    pub group_by: Grouping,

    /// Show extracted colors
    pub show_colors: bool,

    /// Show deep links
    pub show_links: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Set grouping.
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.group_by = grouping;
        self
    }

    /// Show or hide colors.
    pub fn with_colors(mut self, show: bool) -> Self {
        self.show_colors = show;
        self
    }

    /// Show or hide links.
    pub fn with_links(mut self, show: bool) -> Self {
        self.show_links = show;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            group_by: Grouping::None,
            show_colors: true,
            show_links: true,
        }
    }
}

/// How icons are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// One flat list in scan order
    #[default]
    None,
    /// By page (labelled with the page name)
    Page,
    /// By library classification
    Library,
}

impl Grouping {
    /// Parse a grouping name ("none", "page", "library").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Grouping::None),
            "page" | "pages" => Some(Grouping::Page),
            "library" | "libraries" => Some(Grouping::Library),
            _ => None,
        }
    }

    /// Split icons into labelled groups.
    ///
    /// Groups appear in first-seen order and keep the scan order inside.
    /// With `Grouping::None` there is a single group with an empty label.
    pub fn apply<'r>(&self, icons: &'r [IconRecord]) -> Vec<(String, Vec<&'r IconRecord>)> {
        // (key, label, members); pages are keyed by id, names can repeat
        let mut groups: Vec<(&str, &str, Vec<&IconRecord>)> = Vec::new();

        for icon in icons {
            let (key, label) = match self {
                Grouping::None => ("", ""),
                Grouping::Page => (icon.page_id.as_str(), icon.page.as_str()),
                Grouping::Library => {
                    let library = icon.library.as_deref().unwrap_or(UNGROUPED);
                    (library, library)
                }
            };
            match groups.iter_mut().find(|(k, _, _)| *k == key) {
                Some((_, _, members)) => members.push(icon),
                None => groups.push((key, label, vec![icon])),
            }
        }

        groups
            .into_iter()
            .map(|(_, label, members)| (label.to_string(), members))
            .collect()
    }
}
