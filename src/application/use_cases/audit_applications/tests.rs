use super::*;
use crate::application::dto::EnumerationStrategy;
use crate::audit::domain::FindingCategory;
use crate::ports::outbound::ApplicationPage;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Mutex;

const GRAPH: &str = "00000003-0000-0000-c000-000000000000";
const USER_READ: &str = "e1fe6dd8-ba31-4d61-89e7-88639da4683d";
const DIRECTORY_RW: &str = "19dbc75e-c2e2-444c-a770-ec69d8559fc7";

// Mock implementations for testing
struct MockDirectory {
    applications: Option<Vec<Value>>,
}

#[async_trait]
impl ApplicationDirectory for MockDirectory {
    async fn fetch_all(&self, _filter: Option<&str>) -> Result<Vec<Value>> {
        match &self.applications {
            Some(apps) => Ok(apps.clone()),
            None => anyhow::bail!("primary backend unavailable"),
        }
    }

    async fn fetch_top(&self, filter: Option<&str>, _cap: usize) -> Result<Vec<Value>> {
        self.fetch_all(filter).await
    }
}

struct MockPagedDirectory {
    pages: Vec<Vec<Value>>,
}

#[async_trait]
impl PagedApplicationDirectory for MockPagedDirectory {
    async fn fetch_page(
        &self,
        _filter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ApplicationPage> {
        let index: usize = continuation.map(str::parse::<usize>).transpose()?.unwrap_or(0);
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(ApplicationPage::new(items, next))
    }
}

#[derive(Default)]
struct MockServicePrincipals {
    known: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl ServicePrincipalRepository for MockServicePrincipals {
    async fn find_by_app_id(&self, app_id: &str) -> Result<Option<Value>> {
        self.calls.lock().unwrap().push(app_id.to_string());
        Ok(self.known.get(app_id).cloned())
    }
}

#[derive(Default)]
struct MockProgressReporter {
    warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
    fn report_error(&self, _message: &str) {}
    fn report_completion(&self, _message: &str) {}
}

fn graph_service_principal() -> Value {
    json!({
        "appId": GRAPH,
        "displayName": "Microsoft Graph",
        "oauth2PermissionScopes": [{ "id": USER_READ, "value": "User.Read" }],
        "appRoles": [{ "id": DIRECTORY_RW, "value": "Directory.ReadWrite.All" }]
    })
}

fn service_principals() -> MockServicePrincipals {
    MockServicePrincipals {
        known: HashMap::from([(GRAPH.to_string(), graph_service_principal())]),
        ..Default::default()
    }
}

fn metadata() -> ScanMetadata {
    let started = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    ScanMetadataGenerator::generate_metadata("appreg-audit", "test", started)
}

fn risky_app() -> Value {
    json!({
        "appId": "app-risky",
        "displayName": "Risky Portal",
        "web": { "implicitGrantSettings": { "enableAccessTokenIssuance": true } },
        "spa": { "redirectUris": ["https://*.contoso.com/cb"] },
        "requiredResourceAccess": [{
            "resourceAppId": GRAPH,
            "resourceAccess": [{ "id": USER_READ, "type": "Scope" }]
        }]
    })
}

fn clean_app() -> Value {
    json!({
        "appId": "app-clean",
        "displayName": "Clean Service",
        "requiredResourceAccess": [{
            "resourceAppId": GRAPH,
            "resourceAccess": [{ "id": USER_READ, "type": "Scope" }]
        }]
    })
}

fn use_case(
    applications: Option<Vec<Value>>,
    pages: Vec<Vec<Value>>,
) -> AuditApplicationsUseCase<
    MockDirectory,
    MockPagedDirectory,
    MockServicePrincipals,
    MockProgressReporter,
> {
    AuditApplicationsUseCase::new(
        MockDirectory { applications },
        MockPagedDirectory { pages },
        service_principals(),
        MockProgressReporter::default(),
    )
}

#[tokio::test]
async fn test_two_application_scan() {
    let use_case = use_case(Some(vec![clean_app(), risky_app()]), vec![]);

    let response = use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();
    let report = &response.report;

    assert_eq!(report.records.len(), 2);
    let risky = &report.records[0];
    assert_eq!(risky.label(), "Risky Portal");
    assert_eq!(risky.finding_count, 2);
    let categories: Vec<FindingCategory> = risky.findings.iter().map(|f| f.category).collect();
    assert_eq!(
        categories,
        vec![
            FindingCategory::ImplicitGrant,
            FindingCategory::WildcardRedirect
        ]
    );

    let clean = &report.records[1];
    assert_eq!(clean.label(), "Clean Service");
    assert!(clean.is_clean());
    assert_eq!(clean.permissions, vec!["Microsoft Graph:User.Read"]);

    assert!(response.has_findings());
    assert_eq!(report.summary.enumeration_strategy, EnumerationStrategy::BulkFetch);
}

#[tokio::test]
async fn test_shared_resource_resolved_once() {
    let use_case = use_case(Some(vec![clean_app(), risky_app(), clean_app()]), vec![]);

    use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();

    let calls = use_case.resolver_calls();
    assert_eq!(calls, vec![GRAPH.to_string()]);
}

#[tokio::test]
async fn test_unresolved_resource_degrades_to_raw_ids() {
    let app = json!({
        "displayName": "Uses Unknown API",
        "requiredResourceAccess": [{
            "resourceAppId": "unknown-api",
            "resourceAccess": [{ "id": "perm-guid", "type": "Role" }]
        }]
    });
    let use_case = use_case(Some(vec![app]), vec![]);

    let response = use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();

    let record = &response.report.records[0];
    assert_eq!(record.permissions, vec!["unknown-api:perm-guid"]);
    assert_eq!(
        response.report.summary.unresolved_resource_ids,
        vec!["unknown-api"]
    );
    assert_eq!(use_case.progress_reporter.warnings.borrow().len(), 1);
}

#[tokio::test]
async fn test_high_risk_permission_through_the_pipeline() {
    let app = json!({
        "displayName": "Directory Writer",
        "requiredResourceAccess": [{
            "resourceAppId": GRAPH,
            "resourceAccess": [{ "id": DIRECTORY_RW, "type": "Role" }]
        }]
    });
    let use_case = use_case(Some(vec![app]), vec![]);

    let response = use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();

    let findings = &response.report.records[0].findings;
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].category, FindingCategory::HighRiskPermission);
    assert!(findings[0]
        .message
        .contains("Microsoft Graph:Directory.ReadWrite.All"));
}

#[tokio::test]
async fn test_falls_back_to_paginated_backend() {
    let use_case = use_case(
        None,
        vec![
            vec![json!({ "displayName": "p1" })],
            vec![json!({ "displayName": "p2" })],
            vec![json!({ "displayName": "p3" })],
        ],
    );

    let response = use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();

    assert_eq!(response.report.records.len(), 3);
    assert_eq!(
        response.report.summary.enumeration_strategy,
        EnumerationStrategy::Paginated
    );
}

#[tokio::test]
async fn test_zero_applications_with_prefix_warns() {
    let use_case = use_case(Some(vec![clean_app()]), vec![]);

    let response = use_case
        .execute_with_metadata(AuditRequest::new(Some("Nothing".to_string())), metadata())
        .await
        .unwrap();

    assert!(response.report.records.is_empty());
    assert!(!response.has_findings());
    let warnings = use_case.progress_reporter.warnings.borrow();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("matched the prefix 'Nothing'"));
}

#[tokio::test]
async fn test_zero_applications_without_prefix_warns() {
    let use_case = use_case(Some(vec![]), vec![]);

    let response = use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();

    assert_eq!(response.report.summary.total_applications, 0);
    let warnings = use_case.progress_reporter.warnings.borrow();
    assert!(warnings[0].contains("returned no application registrations"));
}

#[tokio::test]
async fn test_custom_policy_is_reported_and_applied() {
    let soon = (metadata().started_at() + ChronoDuration::days(45)).to_rfc3339();
    let app = json!({
        "displayName": "Rotating",
        "passwordCredentials": [{ "displayName": "ci", "endDateTime": soon }]
    });
    let use_case = use_case(Some(vec![app]), vec![])
        .with_policy(RiskPolicy::default().with_expiry_threshold_days(60));

    let response = use_case
        .execute_with_metadata(AuditRequest::default(), metadata())
        .await
        .unwrap();

    assert_eq!(response.report.summary.policy_version, "custom");
    let record = &response.report.records[0];
    assert!(record.flags.expiring_credential);
    assert_eq!(record.credentials[0].days_remaining, Some(45));
}

impl AuditApplicationsUseCase<
    MockDirectory,
    MockPagedDirectory,
    MockServicePrincipals,
    MockProgressReporter,
>
{
    fn resolver_calls(&self) -> Vec<String> {
        self.resolver.repository().calls.lock().unwrap().clone()
    }
}
