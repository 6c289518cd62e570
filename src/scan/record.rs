//! Scan results: icon records, statistics and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Metadata;

use super::classify::MatchReason;

/// Library label for components defined in the scanned document.
pub const LOCAL_COMPONENTS: &str = "Local Components";

/// Library label for remote components whose library name is unknown.
pub const EXTERNAL_LIBRARY: &str = "External Library";

/// One node classified as an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecord {
    /// Node id
    pub id: String,

    /// Node name
    pub name: String,

    /// Host node type string
    #[serde(rename = "type")]
    pub node_type: String,

    /// Width rounded to whole units
    pub width: u32,

    /// Height rounded to whole units
    pub height: u32,

    /// Owning page name
    pub page: String,

    /// Owning page id
    pub page_id: String,

    /// Immediate parent name at match time
    pub parent: Option<String>,

    /// Immediate parent id at match time
    pub parent_id: Option<String>,

    /// Deep link to the node
    pub link: String,

    /// Library classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    /// Main component of an instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_from: Option<LinkedComponent>,

    /// Distinct solid colors in first-seen order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl IconRecord {
    /// Check if the icon comes from a remote library.
    pub fn is_remote(&self) -> bool {
        self.linked_from.as_ref().is_some_and(|l| l.is_remote)
    }

    /// Size as "WxH".
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Main component an instance icon is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedComponent {
    /// Component name
    pub name: String,

    /// Component node id
    pub id: String,

    /// Deep link to the component
    pub link: String,

    /// Library classification
    pub library: String,

    /// Defined in a remote library
    pub is_remote: bool,
}

/// Round a document-unit length the way the host does (half up).
pub(crate) fn round_dimension(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value + 0.5).floor() as u32
}

/// Statistics collected during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Pages scanned
    pub page_count: u32,

    /// Nodes handed to the classifier
    pub nodes_visited: u32,

    /// Icons found
    pub icon_count: u32,

    /// Icons matched by name
    pub by_name: u32,

    /// Icons matched as small components or instances
    pub by_component: u32,

    /// Icons matched as remote library instances
    pub by_remote_instance: u32,

    /// Icons matched as vector-only containers
    pub by_vector_container: u32,

    /// Icons linked to a remote library component
    pub external_count: u32,

    /// Lookups that failed and were absorbed
    pub lookup_failures: u32,
}

impl ScanStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Increment visited node count.
    pub fn add_visit(&mut self) {
        self.nodes_visited += 1;
    }

    /// Count a matched icon.
    pub fn add_icon(&mut self, reason: MatchReason, record: &IconRecord) {
        self.icon_count += 1;
        match reason {
            MatchReason::NamePattern => self.by_name += 1,
            MatchReason::SmallComponent => self.by_component += 1,
            MatchReason::RemoteInstance => self.by_remote_instance += 1,
            MatchReason::VectorContainer => self.by_vector_container += 1,
        }
        if record.is_remote() {
            self.external_count += 1;
        }
    }

    /// Count an absorbed lookup failure.
    pub fn add_lookup_failure(&mut self) {
        self.lookup_failures += 1;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ScanStats) {
        self.page_count += other.page_count;
        self.nodes_visited += other.nodes_visited;
        self.icon_count += other.icon_count;
        self.by_name += other.by_name;
        self.by_component += other.by_component;
        self.by_remote_instance += other.by_remote_instance;
        self.by_vector_container += other.by_vector_container;
        self.external_count += other.external_count;
        self.lookup_failures += other.lookup_failures;
    }
}

/// Result of scanning a document, including icons and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Source document metadata
    pub metadata: Metadata,

    /// Icons in scan order
    pub icons: Vec<IconRecord>,

    /// Scan statistics
    pub stats: ScanStats,

    /// When the scan finished
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    /// Create a new report stamped with the current time.
    pub fn new(metadata: Metadata, icons: Vec<IconRecord>, stats: ScanStats) -> Self {
        Self {
            metadata,
            icons,
            stats,
            scanned_at: Utc::now(),
        }
    }

    /// Number of icons found.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Check if no icons were found.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Names of the distinct pages holding icons, in scan order.
    ///
    /// Pages are told apart by id, so two pages sharing a name appear twice.
    pub fn pages(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut pages: Vec<&str> = Vec::new();
        for icon in &self.icons {
            if !seen.contains(&icon.page_id.as_str()) {
                seen.push(&icon.page_id);
                pages.push(&icon.page);
            }
        }
        pages
    }
}
