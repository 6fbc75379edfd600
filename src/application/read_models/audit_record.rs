//! Per-application view of an audit result

use crate::audit::domain::{
    ApplicationRegistration, Credential, CredentialKind, ExpandedPermission, Finding,
    FindingCategory,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Outcome of expanding and classifying one application.
///
/// Input to [`super::AuditReportBuilder`].
#[derive(Debug, Clone)]
pub struct ApplicationAssessment {
    pub application: ApplicationRegistration,
    pub permissions: Vec<ExpandedPermission>,
    pub findings: Vec<Finding>,
}

impl ApplicationAssessment {
    pub fn new(
        application: ApplicationRegistration,
        permissions: Vec<ExpandedPermission>,
        findings: Vec<Finding>,
    ) -> Self {
        Self {
            application,
            permissions,
            findings,
        }
    }
}

/// Flat, serializable record for one application
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub display_name: Option<String>,
    pub app_id: Option<String>,
    pub object_id: Option<String>,
    pub sign_in_audience: Option<String>,
    pub web_redirect_uris: Vec<String>,
    pub spa_redirect_uris: Vec<String>,
    pub flags: RiskFlags,
    pub findings: Vec<Finding>,
    pub finding_count: usize,
    /// Expanded permissions as `resource:permission`
    pub permissions: Vec<String>,
    pub credentials: Vec<CredentialView>,
    /// Registration payload exactly as the directory returned it
    pub raw: Value,
}

impl AuditRecord {
    /// Display name, falling back to the application ID
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.app_id.as_deref())
            .unwrap_or("(unknown application)")
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// One boolean per finding category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskFlags {
    pub implicit_grant: bool,
    pub public_client: bool,
    pub insecure_redirect: bool,
    pub wildcard_redirect: bool,
    pub high_risk_permission: bool,
    pub exposed_identifier_uri: bool,
    pub expiring_credential: bool,
}

impl RiskFlags {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut flags = RiskFlags::default();
        for finding in findings {
            let flag = match finding.category {
                FindingCategory::ImplicitGrant => &mut flags.implicit_grant,
                FindingCategory::PublicClient => &mut flags.public_client,
                FindingCategory::InsecureRedirect => &mut flags.insecure_redirect,
                FindingCategory::WildcardRedirect => &mut flags.wildcard_redirect,
                FindingCategory::HighRiskPermission => &mut flags.high_risk_permission,
                FindingCategory::ExposedIdentifierUri => &mut flags.exposed_identifier_uri,
                FindingCategory::ExpiringCredential => &mut flags.expiring_credential,
            };
            *flag = true;
        }
        flags
    }
}

/// Credential summary; the secret material itself is never part of the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialView {
    pub kind: CredentialKind,
    pub display_name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub days_remaining: Option<i64>,
}

impl CredentialView {
    pub fn from_credential(credential: &Credential, now: DateTime<Utc>) -> Self {
        Self {
            kind: credential.kind(),
            display_name: credential.display_name().map(str::to_string),
            expires_at: credential.expires_at(),
            days_remaining: credential.days_remaining(now),
        }
    }
}
