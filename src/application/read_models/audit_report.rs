//! Report read model: metadata, summary and records

use super::audit_record::AuditRecord;
use crate::application::dto::EnumerationStrategy;
use crate::audit::domain::FindingCategory;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Complete audit report, ready for a formatter
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub metadata: ScanMetadataView,
    pub summary: AuditSummary,
    /// Sorted by finding count (descending), then display name
    pub records: Vec<AuditRecord>,
}

/// View representation of the scan metadata
#[derive(Debug, Clone, Serialize)]
pub struct ScanMetadataView {
    pub scan_id: String,
    pub started_at: DateTime<Utc>,
    pub tool_name: String,
    pub tool_version: String,
}

/// Aggregate counts over all records
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub total_applications: usize,
    pub applications_with_findings: usize,
    pub clean_applications: usize,
    /// Applications affected per category; categories with no hits are omitted
    pub findings_by_category: BTreeMap<FindingCategory, usize>,
    /// Resource IDs whose permissions could not be resolved to names
    pub unresolved_resource_ids: Vec<String>,
    pub enumeration_strategy: EnumerationStrategy,
    pub policy_version: String,
    /// Display-name prefix the scan was restricted to
    pub filter: Option<String>,
}
