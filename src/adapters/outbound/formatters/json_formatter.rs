use crate::application::read_models::AuditReport;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use anyhow::Context;

/// JsonReportFormatter adapter for the machine-readable report
///
/// Emits the full report as pretty-printed JSON, including each
/// application's raw directory payload.
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format(&self, report: &AuditReport) -> Result<String> {
        serde_json::to_string_pretty(report).context("Failed to serialize audit report to JSON")
    }
}
