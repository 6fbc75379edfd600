use chrono::{DateTime, Utc};
use serde::Serialize;

/// ScanMetadata identifies one audit run.
///
/// `started_at` is also the reference instant for credential expiry, so every
/// application in a scan is measured against the same clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMetadata {
    started_at: DateTime<Utc>,
    tool_name: String,
    tool_version: String,
    scan_id: String,
}

impl ScanMetadata {
    pub fn new(
        started_at: DateTime<Utc>,
        tool_name: String,
        tool_version: String,
        scan_id: String,
    ) -> Self {
        Self {
            started_at,
            tool_name,
            tool_version,
            scan_id,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }
}
