use crate::application::read_models::AuditReport;
use crate::shared::Result;

/// ReportFormatter port for rendering an audit report
pub trait ReportFormatter {
    /// Renders the report
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, report: &AuditReport) -> Result<String>;
}
