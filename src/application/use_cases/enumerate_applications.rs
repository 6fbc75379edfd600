use crate::application::dto::EnumerationStrategy;
use crate::audit::services::ApplicationNormalizer;
use crate::ports::outbound::{ApplicationDirectory, PagedApplicationDirectory};
use crate::shared::error::AuditError;
use crate::shared::Result;
use serde_json::Value;
use tracing::{debug, warn};

/// Page size of the single-page strategy. A page this full is assumed truncated.
pub const TOP_CAP: usize = 999;

/// Safety stop for continuation loops that never terminate
const MAX_PAGES: usize = 10_000;

/// Raw application payloads and the strategy that produced them
#[derive(Debug, Clone)]
pub struct EnumerationOutcome {
    pub applications: Vec<Value>,
    pub strategy: EnumerationStrategy,
}

/// EnumerateApplicationsUseCase - Retrieves every application registration
///
/// Strategies run in order and the first success wins:
/// 1. bulk fetch from the primary backend (must be non-empty)
/// 2. one capped page from the primary backend (must be below the cap)
/// 3. continuation-token pagination against the secondary backend
///
/// Failures of the first two are logged and absorbed. A failure of the
/// third aborts the scan.
///
/// # Type Parameters
/// * `D` - ApplicationDirectory implementation (primary backend)
/// * `P` - PagedApplicationDirectory implementation (secondary backend)
pub struct EnumerateApplicationsUseCase<D, P> {
    directory: D,
    paged_directory: P,
}

impl<D, P> EnumerateApplicationsUseCase<D, P>
where
    D: ApplicationDirectory,
    P: PagedApplicationDirectory,
{
    pub fn new(directory: D, paged_directory: P) -> Self {
        Self {
            directory,
            paged_directory,
        }
    }

    /// Enumerates applications, optionally restricted to a display-name prefix.
    ///
    /// The prefix is sent to every backend and re-applied locally
    /// (case-insensitive), so the result does not depend on which strategy
    /// succeeded.
    pub async fn enumerate(&self, filter: Option<&str>) -> Result<EnumerationOutcome> {
        let (applications, strategy) = match self.try_bulk_fetch(filter).await {
            Some(apps) => (apps, EnumerationStrategy::BulkFetch),
            None => match self.try_single_page(filter).await {
                Some(apps) => (apps, EnumerationStrategy::SinglePage),
                None => (
                    self.fetch_paginated(filter).await?,
                    EnumerationStrategy::Paginated,
                ),
            },
        };

        let applications = match filter {
            Some(prefix) => retain_matching_prefix(applications, prefix),
            None => applications,
        };

        debug!(
            strategy = %strategy,
            count = applications.len(),
            "enumeration complete"
        );

        Ok(EnumerationOutcome {
            applications,
            strategy,
        })
    }

    async fn try_bulk_fetch(&self, filter: Option<&str>) -> Option<Vec<Value>> {
        match self.directory.fetch_all(filter).await {
            Ok(apps) if !apps.is_empty() => Some(apps),
            Ok(_) => {
                debug!("bulk fetch returned no applications, falling back");
                None
            }
            Err(e) => {
                warn!(error = %e, "bulk fetch failed, falling back");
                None
            }
        }
    }

    async fn try_single_page(&self, filter: Option<&str>) -> Option<Vec<Value>> {
        match self.directory.fetch_top(filter, TOP_CAP).await {
            Ok(apps) if apps.len() < TOP_CAP => Some(apps),
            Ok(apps) => {
                warn!(
                    count = apps.len(),
                    cap = TOP_CAP,
                    "single page is full and probably truncated, falling back"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "single page fetch failed, falling back");
                None
            }
        }
    }

    async fn fetch_paginated(&self, filter: Option<&str>) -> Result<Vec<Value>> {
        let mut applications = Vec::new();
        let mut continuation: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let page = self
                .paged_directory
                .fetch_page(filter, continuation.as_deref())
                .await
                .map_err(|e| enumeration_failed(page_number, e))?;

            debug!(page = page_number, items = page.items.len(), "fetched page");
            applications.extend(page.items);

            match page.next_link {
                Some(next) if !next.trim().is_empty() => continuation = Some(next),
                _ => return Ok(applications),
            }
        }

        Err(AuditError::EnumerationFailed {
            reason: format!("pagination did not finish after {} pages", MAX_PAGES),
            hint: "The directory kept returning continuation links. Narrow the scan with --filter."
                .to_string(),
        }
        .into())
    }
}

fn enumeration_failed(page_number: usize, error: anyhow::Error) -> anyhow::Error {
    let auth_failure = error
        .downcast_ref::<AuditError>()
        .is_some_and(AuditError::is_auth_failure);

    let hint = if auth_failure {
        "The token was rejected. Check that it is valid and carries Application.Read.All."
    } else {
        "Check network connectivity and the configured endpoints, then retry."
    };

    AuditError::EnumerationFailed {
        reason: format!(
            "every enumeration strategy failed; page {} of the paginated fetch: {}",
            page_number, error
        ),
        hint: hint.to_string(),
    }
    .into()
}

/// Keeps payloads whose display name starts with `prefix`, ignoring case
fn retain_matching_prefix(applications: Vec<Value>, prefix: &str) -> Vec<Value> {
    let prefix = prefix.to_lowercase();
    applications
        .into_iter()
        .filter(|raw| {
            ApplicationNormalizer::display_name(raw)
                .is_some_and(|name| name.to_lowercase().starts_with(&prefix))
        })
        .collect()
}
