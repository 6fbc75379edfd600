use crate::application::dto::{AuditRequest, AuditResponse};
use crate::application::read_models::{
    ApplicationAssessment, AuditReportBuilder, ScanContext,
};
use crate::application::use_cases::{
    EnumerateApplicationsUseCase, EnumerationOutcome, Resolution,
    ResolveServicePrincipalsUseCase,
};
use crate::audit::domain::{ApplicationRegistration, ScanMetadata};
use crate::audit::policies::RiskPolicy;
use crate::audit::services::{
    ApplicationNormalizer, PermissionExpander, RiskClassifier, ScanMetadataGenerator,
};
use crate::ports::outbound::{
    ApplicationDirectory, PagedApplicationDirectory, ProgressReporter, ServicePrincipalRepository,
};
use crate::shared::Result;
use std::collections::BTreeSet;
use std::time::Duration;

/// AuditApplicationsUseCase - Runs a complete audit scan
///
/// Enumerate, normalize, resolve (once, for all applications), then expand
/// and classify each application and assemble the report.
///
/// # Type Parameters
/// * `D` - ApplicationDirectory implementation
/// * `P` - PagedApplicationDirectory implementation
/// * `R` - ServicePrincipalRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct AuditApplicationsUseCase<D, P, R, PR> {
    enumerator: EnumerateApplicationsUseCase<D, P>,
    resolver: ResolveServicePrincipalsUseCase<R>,
    classifier: RiskClassifier,
    progress_reporter: PR,
}

impl<D, P, R, PR> AuditApplicationsUseCase<D, P, R, PR>
where
    D: ApplicationDirectory,
    P: PagedApplicationDirectory,
    R: ServicePrincipalRepository,
    PR: ProgressReporter,
{
    /// Creates the use case with the built-in risk policy
    pub fn new(
        directory: D,
        paged_directory: P,
        service_principal_repository: R,
        progress_reporter: PR,
    ) -> Self {
        Self {
            enumerator: EnumerateApplicationsUseCase::new(directory, paged_directory),
            resolver: ResolveServicePrincipalsUseCase::new(service_principal_repository),
            classifier: RiskClassifier::default(),
            progress_reporter,
        }
    }

    pub fn with_policy(mut self, policy: RiskPolicy) -> Self {
        self.classifier = RiskClassifier::new(policy);
        self
    }

    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.resolver = self.resolver.with_max_concurrent_lookups(limit);
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.resolver = self.resolver.with_lookup_timeout(timeout);
        self
    }

    /// Executes a scan starting now
    pub async fn execute(&self, request: AuditRequest) -> Result<AuditResponse> {
        self.execute_with_metadata(request, ScanMetadataGenerator::generate_default_metadata())
            .await
    }

    /// Executes a scan stamped with `metadata`.
    ///
    /// `metadata.started_at()` is the reference time for credential expiry.
    pub async fn execute_with_metadata(
        &self,
        request: AuditRequest,
        metadata: ScanMetadata,
    ) -> Result<AuditResponse> {
        let filter = request.filter.as_deref();

        // Step 1: Enumerate
        let outcome = self.enumerate_and_report(filter).await?;
        let strategy = outcome.strategy;

        if outcome.applications.is_empty() {
            self.report_no_applications(filter);
        }

        // Step 2: Normalize
        let applications: Vec<ApplicationRegistration> = outcome
            .applications
            .into_iter()
            .map(ApplicationNormalizer::normalize)
            .collect();

        // Step 3: Resolve every referenced resource once
        let resolution = self.resolve_and_report(&applications).await;

        // Step 4: Expand and classify
        let assessments = self.assess(applications, &resolution, &metadata);

        let flagged = assessments.iter().filter(|a| !a.findings.is_empty()).count();
        self.progress_reporter.report_completion(&format!(
            "✅ Audit complete: {} of {} application(s) have findings",
            flagged,
            assessments.len()
        ));

        // Step 5: Assemble
        let context = ScanContext {
            strategy,
            unresolved_resource_ids: resolution.unresolved,
            policy_version: self.classifier.policy().version().to_string(),
            filter: request.filter.clone(),
        };
        let report = AuditReportBuilder::build(assessments, &metadata, context);

        Ok(AuditResponse::new(report))
    }

    async fn enumerate_and_report(&self, filter: Option<&str>) -> Result<EnumerationOutcome> {
        match filter {
            Some(prefix) => self.progress_reporter.report(&format!(
                "🔍 Enumerating application registrations starting with '{}'...",
                prefix
            )),
            None => self
                .progress_reporter
                .report("🔍 Enumerating application registrations..."),
        }

        let outcome = self.enumerator.enumerate(filter).await?;

        self.progress_reporter.report(&format!(
            "✅ Retrieved {} application(s) via {}",
            outcome.applications.len(),
            outcome.strategy
        ));
        Ok(outcome)
    }

    fn report_no_applications(&self, filter: Option<&str>) {
        let message = match filter {
            Some(prefix) => format!(
                "⚠️  Warning: No application registration matched the prefix '{}'.",
                prefix
            ),
            None => "⚠️  Warning: The directory returned no application registrations."
                .to_string(),
        };
        self.progress_reporter.report_warning(&message);
    }

    async fn resolve_and_report(&self, applications: &[ApplicationRegistration]) -> Resolution {
        let resource_ids: BTreeSet<String> = applications
            .iter()
            .flat_map(|app| app.required_resource_access())
            .map(|entry| entry.resource_app_id.clone())
            .collect();

        if resource_ids.is_empty() {
            return Resolution::default();
        }

        self.progress_reporter.report(&format!(
            "🔑 Resolving {} resource application(s)...",
            resource_ids.len()
        ));

        let resolution = self
            .resolver
            .resolve_with_progress(&resource_ids, |current, total| {
                self.progress_reporter.report_progress(
                    current,
                    total,
                    Some("Resolving service principals..."),
                )
            })
            .await;

        if !resolution.unresolved.is_empty() {
            self.progress_reporter.report_warning(&format!(
                "⚠️  Warning: {} resource application(s) could not be resolved; their permissions are shown as raw IDs.",
                resolution.unresolved.len()
            ));
        }
        self.progress_reporter.report_completion(&format!(
            "✅ Resolved {} of {} resource application(s)",
            resolution.catalog.len(),
            resource_ids.len()
        ));

        resolution
    }

    fn assess(
        &self,
        applications: Vec<ApplicationRegistration>,
        resolution: &Resolution,
        metadata: &ScanMetadata,
    ) -> Vec<ApplicationAssessment> {
        applications
            .into_iter()
            .map(|app| {
                let permissions =
                    PermissionExpander::expand(app.required_resource_access(), &resolution.catalog);
                let findings = self
                    .classifier
                    .classify(&app, &permissions, metadata.started_at());
                ApplicationAssessment::new(app, permissions, findings)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
