//! JSON rendering for scan reports.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::scan::{IconRecord, ScanReport};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a scan report (metadata, icons and statistics) to JSON.
pub fn to_json(report: &ScanReport, format: JsonFormat) -> Result<String> {
    serialize(report, format)
}

/// Convert a bare icon list to JSON, the shape a `scan-results` message carries.
pub fn icons_to_json(icons: &[IconRecord], format: JsonFormat) -> Result<String> {
    serialize(icons, format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metadata;
    use crate::scan::ScanStats;

    fn report() -> ScanReport {
        let icon = IconRecord {
            id: "1:2".into(),
            name: "home".into(),
            node_type: "COMPONENT".into(),
            width: 24,
            height: 24,
            page: "Icons".into(),
            page_id: "0:1".into(),
            parent: Some("Icons".into()),
            parent_id: Some("0:1".into()),
            link: "https://www.figma.com/file/K?node-id=1%3A2".into(),
            library: Some("Local Components".into()),
            linked_from: None,
            colors: Some(vec!["#000000".into()]),
        };
        ScanReport::new(Metadata::with_name("Kit"), vec![icon], ScanStats::new())
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&report(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"pageId\""));
        assert!(json.contains("Local Components"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&report(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_icons_to_json_is_array() {
        let report = report();
        let json = icons_to_json(&report.icons, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "COMPONENT");
        assert_eq!(value[0]["colors"][0], "#000000");
    }
}
