//! Plain text rendering for scan reports.

use crate::error::Result;
use crate::scan::{IconRecord, ScanReport};

use super::{Grouping, RenderOptions};

/// Convert a scan report to plain text, one icon per block.
pub fn to_text(report: &ScanReport, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    for (label, icons) in options.group_by.apply(&report.icons) {
        if options.group_by != Grouping::None {
            output.push_str(&format!("{} ({})\n\n", label, icons.len()));
        }
        for icon in icons {
            render_icon(&mut output, icon, options);
        }
    }

    output.push_str(&summary(report));
    Ok(output.trim().to_string())
}

fn render_icon(output: &mut String, icon: &IconRecord, options: &RenderOptions) {
    output.push_str(&format!(
        "{} [{} {}]\n",
        icon.name,
        icon.node_type,
        icon.size_label()
    ));

    let location = match icon.parent {
        Some(ref parent) if *parent != icon.page => format!("{} > {}", icon.page, parent),
        _ => icon.page.clone(),
    };
    output.push_str(&format!("  at: {}\n", location));

    if let Some(ref library) = icon.library {
        match icon.linked_from {
            Some(ref main) => output.push_str(&format!("  library: {} ({})\n", library, main.name)),
            None => output.push_str(&format!("  library: {}\n", library)),
        }
    }
    if options.show_colors {
        if let Some(colors) = icon.colors.as_ref().filter(|c| !c.is_empty()) {
            output.push_str(&format!("  colors: {}\n", colors.join(", ")));
        }
    }
    if options.show_links {
        output.push_str(&format!("  link: {}\n", icon.link));
    }
    output.push('\n');
}

fn summary(report: &ScanReport) -> String {
    let pages = report.pages().len();
    format!(
        "{} icon{} on {} page{}",
        report.len(),
        if report.len() == 1 { "" } else { "s" },
        pages,
        if pages == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metadata;
    use crate::scan::{LinkedComponent, ScanStats};

    fn icon(id: &str, page: &str) -> IconRecord {
        IconRecord {
            id: id.into(),
            name: format!("icon-{}", id),
            node_type: "INSTANCE".into(),
            width: 24,
            height: 16,
            page: page.into(),
            page_id: format!("id-{}", page),
            parent: Some("Toolbar".into()),
            parent_id: Some("1:1".into()),
            link: format!("https://www.figma.com/file/K?node-id={}", id),
            library: Some("Material".into()),
            linked_from: Some(LinkedComponent {
                name: "home".into(),
                id: "9:1".into(),
                link: String::new(),
                library: "Material".into(),
                is_remote: true,
            }),
            colors: Some(vec!["#000000".into(), "#ffffff".into()]),
        }
    }

    fn report(icons: Vec<IconRecord>) -> ScanReport {
        ScanReport::new(Metadata::with_name("Kit"), icons, ScanStats::new())
    }

    #[test]
    fn test_to_text() {
        let text = to_text(&report(vec![icon("a", "Icons")]), &RenderOptions::default()).unwrap();
        assert!(text.starts_with("icon-a [INSTANCE 24x16]"));
        assert!(text.contains("  at: Icons > Toolbar"));
        assert!(text.contains("  library: Material (home)"));
        assert!(text.contains("  colors: #000000, #ffffff"));
        assert!(text.contains("node-id=a"));
        assert!(text.ends_with("1 icon on 1 page"));
    }

    #[test]
    fn test_to_text_grouped_without_extras() {
        let options = RenderOptions::new()
            .with_grouping(Grouping::Page)
            .with_colors(false)
            .with_links(false);
        let text = to_text(
            &report(vec![icon("a", "Icons"), icon("b", "Archive"), icon("c", "Icons")]),
            &options,
        )
        .unwrap();

        assert!(text.starts_with("Icons (2)"));
        assert!(text.contains("Archive (1)"));
        assert!(!text.contains("colors:"));
        assert!(!text.contains("link:"));
        assert!(text.ends_with("3 icons on 2 pages"));
    }

    #[test]
    fn test_empty_report() {
        let text = to_text(&report(Vec::new()), &RenderOptions::default()).unwrap();
        assert_eq!(text, "0 icons on 0 pages");
    }
}
