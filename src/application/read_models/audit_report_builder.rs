//! Builder for constructing an AuditReport from assessed applications

use super::audit_record::{ApplicationAssessment, AuditRecord, CredentialView, RiskFlags};
use super::audit_report::{AuditReport, AuditSummary, ScanMetadataView};
use crate::application::dto::EnumerationStrategy;
use crate::audit::domain::ScanMetadata;
use std::collections::BTreeMap;

/// Scan-wide facts that end up in the summary
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub strategy: EnumerationStrategy,
    pub unresolved_resource_ids: Vec<String>,
    pub policy_version: String,
    pub filter: Option<String>,
}

/// Builder for constructing an [`AuditReport`]
///
/// Flattens each assessment into an [`AuditRecord`], sorts the records and
/// computes the summary. Clean applications are kept, never dropped.
pub struct AuditReportBuilder;

impl AuditReportBuilder {
    pub fn build(
        assessments: Vec<ApplicationAssessment>,
        metadata: &ScanMetadata,
        context: ScanContext,
    ) -> AuditReport {
        let mut records: Vec<AuditRecord> = assessments
            .into_iter()
            .map(|assessment| Self::build_record(assessment, metadata))
            .collect();

        records.sort_by(|a, b| {
            b.finding_count
                .cmp(&a.finding_count)
                .then_with(|| a.label().to_lowercase().cmp(&b.label().to_lowercase()))
        });

        let summary = Self::build_summary(&records, context);

        AuditReport {
            metadata: Self::build_metadata(metadata),
            summary,
            records,
        }
    }

    fn build_metadata(metadata: &ScanMetadata) -> ScanMetadataView {
        ScanMetadataView {
            scan_id: metadata.scan_id().to_string(),
            started_at: metadata.started_at(),
            tool_name: metadata.tool_name().to_string(),
            tool_version: metadata.tool_version().to_string(),
        }
    }

    fn build_record(assessment: ApplicationAssessment, metadata: &ScanMetadata) -> AuditRecord {
        let ApplicationAssessment {
            application: app,
            permissions,
            findings,
        } = assessment;

        let credentials = app
            .credentials()
            .map(|c| CredentialView::from_credential(c, metadata.started_at()))
            .collect();

        AuditRecord {
            display_name: app.display_name().map(str::to_string),
            app_id: app.app_id().map(str::to_string),
            object_id: app.object_id().map(str::to_string),
            sign_in_audience: app.sign_in_audience().map(str::to_string),
            web_redirect_uris: app.web_redirect_uris().to_vec(),
            spa_redirect_uris: app.spa_redirect_uris().to_vec(),
            flags: RiskFlags::from_findings(&findings),
            finding_count: findings.len(),
            findings,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            credentials,
            raw: app.raw().clone(),
        }
    }

    fn build_summary(records: &[AuditRecord], context: ScanContext) -> AuditSummary {
        let mut findings_by_category = BTreeMap::new();
        for record in records {
            for finding in &record.findings {
                *findings_by_category.entry(finding.category).or_insert(0) += 1;
            }
        }

        let applications_with_findings = records.iter().filter(|r| !r.is_clean()).count();

        let mut unresolved_resource_ids = context.unresolved_resource_ids;
        unresolved_resource_ids.sort();
        unresolved_resource_ids.dedup();

        AuditSummary {
            total_applications: records.len(),
            applications_with_findings,
            clean_applications: records.len() - applications_with_findings,
            findings_by_category,
            unresolved_resource_ids,
            enumeration_strategy: context.strategy,
            policy_version: context.policy_version,
            filter: context.filter,
        }
    }
}
