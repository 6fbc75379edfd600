use crate::audit::domain::{PermissionCatalog, ServicePrincipalCatalog};
use crate::audit::services::ApplicationNormalizer;
use crate::ports::outbound::ServicePrincipalRepository;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 8;
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog built by one resolve pass, plus the IDs that could not be resolved
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub catalog: PermissionCatalog,
    /// Sorted resource IDs whose lookup failed, timed out or matched nothing
    pub unresolved: Vec<String>,
}

/// ResolveServicePrincipalsUseCase - Builds the permission catalog for a scan
///
/// Issues exactly one lookup per distinct, non-blank resource application ID,
/// with bounded concurrency and a per-lookup timeout. A failed lookup only
/// leaves its ID out of the catalog; `resolve` itself never fails.
pub struct ResolveServicePrincipalsUseCase<R> {
    repository: R,
    max_concurrent_lookups: usize,
    lookup_timeout: Duration,
}

impl<R: ServicePrincipalRepository> ResolveServicePrincipalsUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Sets the concurrency bound; zero is treated as one
    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn resolve(&self, resource_app_ids: &BTreeSet<String>) -> Resolution {
        self.resolve_with_progress(resource_app_ids, |_, _| {}).await
    }

    /// Like [`resolve`](Self::resolve), calling `on_progress(completed, total)`
    /// after every finished lookup
    pub async fn resolve_with_progress<F>(
        &self,
        resource_app_ids: &BTreeSet<String>,
        mut on_progress: F,
    ) -> Resolution
    where
        F: FnMut(usize, usize),
    {
        let distinct: BTreeSet<&str> = resource_app_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        let total = distinct.len();
        let mut completed = 0;

        let results: Vec<(&str, Option<ServicePrincipalCatalog>)> = stream::iter(distinct)
            .map(|app_id| async move { (app_id, self.lookup(app_id).await) })
            .buffer_unordered(self.max_concurrent_lookups)
            .inspect(|_| {
                completed += 1;
                on_progress(completed, total);
            })
            .collect()
            .await;

        let mut resolution = Resolution::default();
        for (app_id, entry) in results {
            match entry {
                Some(entry) => resolution.catalog.insert(entry),
                None => resolution.unresolved.push(app_id.to_string()),
            }
        }
        resolution.unresolved.sort();

        debug!(
            resolved = resolution.catalog.len(),
            unresolved = resolution.unresolved.len(),
            "service principal resolution complete"
        );
        resolution
    }

    async fn lookup(&self, app_id: &str) -> Option<ServicePrincipalCatalog> {
        let lookup = self.repository.find_by_app_id(app_id);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(raw))) => Some(ApplicationNormalizer::normalize_service_principal(
                app_id, &raw,
            )),
            Ok(Ok(None)) => {
                debug!(app_id, "no service principal matched");
                None
            }
            Ok(Err(e)) => {
                warn!(app_id, error = %e, "service principal lookup failed");
                None
            }
            Err(_) => {
                warn!(
                    app_id,
                    timeout_secs = self.lookup_timeout.as_secs(),
                    "service principal lookup timed out"
                );
                None
            }
        }
    }
}
