//! Read models for CQRS-lite pattern
//!
//! View-optimized, serializable structs consumed by the report formatters.

mod audit_record;
mod audit_report;
mod audit_report_builder;

pub use audit_record::{ApplicationAssessment, AuditRecord, CredentialView, RiskFlags};
pub use audit_report::{AuditReport, AuditSummary, ScanMetadataView};
pub use audit_report_builder::{AuditReportBuilder, ScanContext};
