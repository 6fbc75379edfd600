use crate::application::read_models::{AuditRecord, AuditReport, AuditSummary};
use crate::audit::domain::FindingCategory;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

const SUMMARY_TABLE_HEADER: &str = "| Metric | Value |\n";
const SUMMARY_TABLE_SEPARATOR: &str = "|--------|-------|\n";

const FINDINGS_TABLE_HEADER: &str = "| Application | App ID | Findings | Details |\n";
const FINDINGS_TABLE_SEPARATOR: &str = "|-------------|--------|----------|---------|\n";

/// MarkdownReportFormatter adapter for a human-readable report
///
/// Raw directory payloads are left out; only the flattened record fields
/// are rendered.
pub struct MarkdownReportFormatter;

impl MarkdownReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    ///
    /// Backslashes are escaped first so a trailing `\` cannot neutralize the
    /// escape of the pipe that follows it.
    fn escape_cell(text: &str) -> String {
        single_line(text).replace('\\', "\\\\").replace('|', "\\|")
    }

    fn render_header(&self, output: &mut String, report: &AuditReport) {
        output.push_str("# Application Registration Audit\n\n");
        output.push_str(&format!(
            "Scan `{}` started {} by {} {}.\n\n",
            report.metadata.scan_id,
            report.metadata.started_at.to_rfc3339(),
            report.metadata.tool_name,
            report.metadata.tool_version
        ));
    }

    fn render_summary(&self, output: &mut String, summary: &AuditSummary) {
        output.push_str("## Summary\n\n");
        output.push_str(SUMMARY_TABLE_HEADER);
        output.push_str(SUMMARY_TABLE_SEPARATOR);

        let filter = summary.filter.as_deref().unwrap_or("(none)");
        let rows = [
            ("Applications", summary.total_applications.to_string()),
            ("With findings", summary.applications_with_findings.to_string()),
            ("Clean", summary.clean_applications.to_string()),
            ("Enumeration", summary.enumeration_strategy.description().to_string()),
            ("Policy version", summary.policy_version.clone()),
            ("Name prefix", filter.to_string()),
        ];
        for (metric, value) in rows {
            output.push_str(&format!("| {} | {} |\n", metric, Self::escape_cell(&value)));
        }
        output.push('\n');

        if !summary.findings_by_category.is_empty() {
            output.push_str("### Findings by Category\n\n");
            output.push_str("| Category | Applications |\n");
            output.push_str("|----------|--------------|\n");
            for category in FindingCategory::ALL {
                if let Some(count) = summary.findings_by_category.get(&category) {
                    output.push_str(&format!("| {} | {} |\n", category.label(), count));
                }
            }
            output.push('\n');
        }

        if !summary.unresolved_resource_ids.is_empty() {
            output.push_str("### Unresolved Resources\n\n");
            output.push_str(
                "Permissions on these resources are shown by identifier only.\n\n",
            );
            for id in &summary.unresolved_resource_ids {
                output.push_str(&format!("- `{}`\n", single_line(id)));
            }
            output.push('\n');
        }
    }

    fn render_findings(&self, output: &mut String, records: &[AuditRecord]) {
        output.push_str("## Applications\n\n");

        if records.is_empty() {
            output.push_str("*No applications found*\n\n");
            return;
        }

        output.push_str(FINDINGS_TABLE_HEADER);
        output.push_str(FINDINGS_TABLE_SEPARATOR);

        for record in records {
            let details = if record.is_clean() {
                "No findings".to_string()
            } else {
                record
                    .findings
                    .iter()
                    .map(|f| f.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };

            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::escape_cell(record.label()),
                Self::escape_cell(record.app_id.as_deref().unwrap_or("N/A")),
                record.finding_count,
                Self::escape_cell(&details)
            ));
        }
        output.push('\n');
    }
}

/// Collapses `\r\n`, `\r` and `\n` into single spaces
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

impl Default for MarkdownReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownReportFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        let mut output = String::new();

        self.render_header(&mut output, report);
        self.render_summary(&mut output, &report.summary);
        self.render_findings(&mut output, &report.records);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::formatters::test_support::sample_report;

    /// Counts table cells, ignoring pipes preceded by an odd run of backslashes
    fn cell_count(row: &str) -> usize {
        let mut delimiters = 0;
        let mut escaped = false;
        for c in row.chars() {
            match c {
                '\\' => escaped = !escaped,
                '|' if !escaped => delimiters += 1,
                _ => escaped = false,
            }
        }
        delimiters - 1
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(
            MarkdownReportFormatter::escape_cell("a|b\nc"),
            "a\\|b c"
        );
    }

    #[test]
    fn test_escape_cell_backslash_before_pipe() {
        assert_eq!(
            MarkdownReportFormatter::escape_cell("tail\\|more"),
            "tail\\\\\\|more"
        );
    }

    #[test]
    fn test_escape_cell_flattens_carriage_returns() {
        let escaped = MarkdownReportFormatter::escape_cell("Evil\r\n| x |\ry\n");
        assert!(!escaped.contains('\r'));
        assert!(!escaped.contains('\n'));
        assert_eq!(escaped, "Evil \\| x \\| y ");
    }

    #[test]
    fn test_hostile_display_name_stays_in_one_row() {
        let mut report = sample_report();
        report.records[0].display_name =
            Some("Evil\\| forged | row |\r\n| Fake | app | 0 | No findings |".to_string());

        let output = MarkdownReportFormatter::new().format(&report).unwrap();
        let rows: Vec<&str> = output
            .lines()
            .skip_while(|line| !line.starts_with("| Application |"))
            .take_while(|line| line.starts_with('|'))
            .collect();

        // header, separator and one row per record
        assert_eq!(rows.len(), 2 + report.records.len());
        assert!(!output.contains('\r'));
        for row in &rows {
            assert_eq!(cell_count(row), 4, "row: {}", row);
        }
    }

    #[test]
    fn test_markdown_structure() {
        let output = MarkdownReportFormatter::new().format(&sample_report()).unwrap();

        assert!(output.starts_with("# Application Registration Audit"));
        assert!(output.contains("## Summary"));
        assert!(output.contains("| Applications | 2 |"));
        assert!(output.contains("| With findings | 1 |"));
        assert!(output.contains("| Name prefix | Legacy |"));
        assert!(output.contains("### Findings by Category"));
        assert!(output.contains("| Implicit grant | 1 |"));
        assert!(output.contains("- `res-unknown`"));
    }

    #[test]
    fn test_markdown_findings_row() {
        let output = MarkdownReportFormatter::new().format(&sample_report()).unwrap();

        let row = output
            .lines()
            .find(|line| line.starts_with("| Legacy \\| Portal"))
            .expect("risky application row");
        assert!(row.contains("Implicit grant enabled (access token: true, ID token: false)"));
        assert!(row.contains("; "));
        assert!(output.contains("| Clean App | app-2 | 0 | No findings |"));
    }

    #[test]
    fn test_markdown_omits_raw_payload() {
        let output = MarkdownReportFormatter::new().format(&sample_report()).unwrap();
        assert!(!output.contains("do-not-print"));
        assert!(!output.contains("passwordCredentials"));
    }
}
