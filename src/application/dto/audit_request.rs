/// AuditRequest - Input of the audit use case
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    /// Optional display-name prefix; only matching applications are audited
    pub filter: Option<String>,
}

impl AuditRequest {
    /// Blank prefixes are treated as "no filter"
    pub fn new(filter: Option<String>) -> Self {
        let filter = filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        Self { filter }
    }
}
