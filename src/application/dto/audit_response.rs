use crate::application::read_models::AuditReport;

/// AuditResponse - Output of the audit use case
///
/// Carries the assembled report; formatting is left to the caller.
#[derive(Debug, Clone)]
pub struct AuditResponse {
    pub report: AuditReport,
}

impl AuditResponse {
    pub fn new(report: AuditReport) -> Self {
        Self { report }
    }

    /// True when at least one application has a finding.
    /// Drives the `--fail-on-findings` exit code.
    pub fn has_findings(&self) -> bool {
        self.report.summary.applications_with_findings > 0
    }
}
