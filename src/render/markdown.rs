//! Markdown rendering for scan reports.

use crate::error::Result;
use crate::scan::{IconRecord, ScanReport};

use super::{Grouping, RenderOptions};

/// Convert a scan report to Markdown.
pub fn to_markdown(report: &ScanReport, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(report)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a report to Markdown.
    pub fn render(&self, report: &ScanReport) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&report.metadata.to_yaml_frontmatter());
        }

        let title = if report.metadata.name.is_empty() {
            "Icons".to_string()
        } else {
            format!("Icons in {}", escape_markdown(&report.metadata.name))
        };
        output.push_str(&format!("# {}\n\n", title));

        if report.is_empty() {
            output.push_str("_No icons found._\n");
            return Ok(output.trim().to_string());
        }

        output.push_str(&format!(
            "Found **{}** icons on {} page(s).\n\n",
            report.len(),
            report.pages().len()
        ));

        for (label, icons) in self.options.group_by.apply(&report.icons) {
            if self.options.group_by != Grouping::None {
                output.push_str(&format!("## {} ({})\n\n", escape_markdown(&label), icons.len()));
            }
            self.render_table(&mut output, &icons);
        }

        Ok(output.trim().to_string())
    }

    fn render_table(&self, output: &mut String, icons: &[&IconRecord]) {
        let mut header = vec!["Name", "Type", "Size", "Page", "Parent", "Library"];
        if self.options.show_colors {
            header.push("Colors");
        }
        if self.options.show_links {
            header.push("Link");
        }

        output.push('|');
        for title in &header {
            output.push_str(&format!(" {} |", title));
        }
        output.push_str("\n|");
        for _ in &header {
            output.push_str(" --- |");
        }
        output.push('\n');

        for icon in icons {
            let mut cells = vec![
                escape_cell(&icon.name),
                icon.node_type.clone(),
                icon.size_label(),
                escape_cell(&icon.page),
                escape_cell(icon.parent.as_deref().unwrap_or("")),
                escape_cell(icon.library.as_deref().unwrap_or("")),
            ];
            if self.options.show_colors {
                let colors = icon.colors.as_deref().unwrap_or_default();
                cells.push(
                    colors
                        .iter()
                        .map(|c| format!("`{}`", c))
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }
            if self.options.show_links {
                cells.push(format!("[open]({})", icon.link));
            }

            output.push('|');
            for cell in cells {
                output.push_str(&format!(" {} |", cell));
            }
            output.push('\n');
        }

        output.push('\n');
    }
}

/// Escape text placed inside a table cell.
fn escape_cell(text: &str) -> String {
    escape_markdown(text).replace('\n', " ")
}

/// Escape special Markdown characters.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
