use crate::ports::outbound::{
    ApplicationDirectory, ApplicationPage, PagedApplicationDirectory, ServicePrincipalRepository,
};
use crate::shared::error::AuditError;
use crate::shared::security::validate_endpoint_url;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_SECONDARY_ENDPOINT: &str = "https://graph.microsoft.com/beta";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
/// Upper bound on a server-requested Retry-After wait
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);
/// Guard against a primary backend that never stops returning next links
const MAX_BULK_PAGES: usize = 10_000;
const SERVICE_PRINCIPAL_SELECT: &str = "id,appId,displayName,oauth2PermissionScopes,appRoles";

/// Settings for [`GraphClient`]
#[derive(Clone)]
pub struct GraphClientConfig {
    pub endpoint: String,
    pub secondary_endpoint: String,
    pub token: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl GraphClientConfig {
    /// Default endpoints and limits for the given bearer token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            secondary_endpoint: DEFAULT_SECONDARY_ENDPOINT.to_string(),
            token: token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl fmt::Debug for GraphClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphClientConfig")
            .field("endpoint", &self.endpoint)
            .field("secondary_endpoint", &self.secondary_endpoint)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ODataCollection {
    #[serde(default)]
    value: Vec<Value>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

/// GraphClient adapter for the identity directory REST API
///
/// Implements all three directory ports:
/// - [`ApplicationDirectory`] against `{endpoint}/applications`
/// - [`PagedApplicationDirectory`] against `{secondary_endpoint}/applications`
/// - [`ServicePrincipalRepository`] against `{endpoint}/servicePrincipals`
///
/// Requests carry the bearer token and are retried on HTTP 429 and 5xx,
/// honoring `Retry-After`. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct GraphClient {
    client: reqwest::Client,
    endpoint: String,
    secondary_endpoint: String,
    token: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphClient")
            .field("endpoint", &self.endpoint)
            .field("secondary_endpoint", &self.secondary_endpoint)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    pub fn new(config: GraphClientConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(AuditError::MissingCredential.into());
        }
        validate_endpoint_url(&config.endpoint)?;
        validate_endpoint_url(&config.secondary_endpoint)?;

        let user_agent = format!("appreg-audit/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            secondary_endpoint: config.secondary_endpoint.trim_end_matches('/').to_string(),
            token: config.token,
            max_retries: config.max_retries,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Overrides the linear backoff step used when no `Retry-After` is sent
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn applications_url(base: &str, filter: Option<&str>, top: Option<usize>) -> String {
        let mut params = Vec::new();
        if let Some(top) = top {
            params.push(format!("$top={}", top));
        }
        if let Some(prefix) = filter {
            params.push(format!("$filter={}", urlencoding::encode(&prefix_filter(prefix))));
        }

        if params.is_empty() {
            format!("{}/applications", base)
        } else {
            format!("{}/applications?{}", base, params.join("&"))
        }
    }

    fn service_principal_url(&self, app_id: &str) -> String {
        let filter = format!("appId eq '{}'", escape_odata_literal(app_id));
        format!(
            "{}/servicePrincipals?$filter={}&$select={}",
            self.endpoint,
            urlencoding::encode(&filter),
            SERVICE_PRINCIPAL_SELECT
        )
    }

    /// Sends an authenticated GET and decodes an OData collection, retrying
    /// throttled and transient failures
    async fn get_collection(&self, url: &str) -> Result<ODataCollection> {
        let endpoint = endpoint_label(url);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let can_retry = attempt <= self.max_retries;

            let response = match self.client.get(url).bearer_auth(&self.token).send().await {
                Ok(response) => response,
                Err(e) if can_retry && (e.is_timeout() || e.is_connect()) => {
                    warn!(endpoint, attempt, error = %e, "request failed, retrying");
                    tokio::time::sleep(self.retry_delay * attempt).await;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Request to {} failed", endpoint));
                }
            };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<ODataCollection>()
                    .await
                    .with_context(|| format!("Unexpected response body from {}", endpoint));
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(AuditError::AccessDenied {
                    status: status.as_u16(),
                    endpoint: endpoint.to_string(),
                }
                .into());
            }

            if can_retry && is_retryable(status) {
                let delay = retry_after(&response).unwrap_or(self.retry_delay * attempt);
                debug!(
                    endpoint,
                    attempt,
                    status = status.as_u16(),
                    delay_ms = delay.as_millis() as u64,
                    "throttled or transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(AuditError::ApiError {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            }
            .into());
        }
    }

    /// Rejects continuation links that leave the configured endpoint's origin
    fn ensure_same_origin(base: &str, link: &str) -> Result<()> {
        let base = Url::parse(base).with_context(|| format!("Invalid endpoint URL: {}", base))?;
        let next =
            Url::parse(link).with_context(|| format!("Invalid continuation link: {}", link))?;

        if base.origin() != next.origin() {
            anyhow::bail!(
                "Refusing to follow continuation link to a different origin: {}",
                endpoint_label(link)
            );
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationDirectory for GraphClient {
    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<Value>> {
        let mut url = Self::applications_url(&self.endpoint, filter, None);
        let mut applications = Vec::new();

        for _ in 0..MAX_BULK_PAGES {
            let page = self.get_collection(&url).await?;
            applications.extend(page.value);

            match page.next_link {
                Some(next) => {
                    Self::ensure_same_origin(&self.endpoint, &next)?;
                    url = next;
                }
                None => return Ok(applications),
            }
        }

        anyhow::bail!("Bulk fetch did not finish after {} pages", MAX_BULK_PAGES)
    }

    async fn fetch_top(&self, filter: Option<&str>, cap: usize) -> Result<Vec<Value>> {
        let url = Self::applications_url(&self.endpoint, filter, Some(cap));
        Ok(self.get_collection(&url).await?.value)
    }
}

#[async_trait]
impl PagedApplicationDirectory for GraphClient {
    async fn fetch_page(
        &self,
        filter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ApplicationPage> {
        let url = match continuation {
            Some(link) => {
                Self::ensure_same_origin(&self.secondary_endpoint, link)?;
                link.to_string()
            }
            None => Self::applications_url(&self.secondary_endpoint, filter, None),
        };

        let page = self.get_collection(&url).await?;
        Ok(ApplicationPage::new(page.value, page.next_link))
    }
}

#[async_trait]
impl ServicePrincipalRepository for GraphClient {
    async fn find_by_app_id(&self, app_id: &str) -> Result<Option<Value>> {
        let url = self.service_principal_url(app_id);
        Ok(self.get_collection(&url).await?.value.into_iter().next())
    }
}

/// `startswith(displayName,'<prefix>')` with the prefix escaped
fn prefix_filter(prefix: &str) -> String {
    format!("startswith(displayName,'{}')", escape_odata_literal(prefix))
}

/// Doubles single quotes so the value cannot terminate an OData string literal
fn escape_odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    let seconds: u64 = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER))
}

/// URL without its query string, for messages and logs
fn endpoint_label(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
