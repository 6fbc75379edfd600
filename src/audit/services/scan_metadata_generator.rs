use crate::audit::domain::ScanMetadata;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const TOOL_NAME: &str = "appreg-audit";

/// ScanMetadataGenerator stamps a scan with its start time and a unique ID
pub struct ScanMetadataGenerator;

impl ScanMetadataGenerator {
    /// Generates metadata for a scan starting at `started_at`
    pub fn generate_metadata(
        tool_name: &str,
        tool_version: &str,
        started_at: DateTime<Utc>,
    ) -> ScanMetadata {
        let scan_id = format!("urn:uuid:{}", Uuid::new_v4());

        ScanMetadata::new(
            started_at,
            tool_name.to_string(),
            tool_version.to_string(),
            scan_id,
        )
    }

    /// Metadata for a scan starting now, tagged with this build's version
    pub fn generate_default_metadata() -> ScanMetadata {
        Self::generate_metadata(TOOL_NAME, env!("CARGO_PKG_VERSION"), Utc::now())
    }
}
