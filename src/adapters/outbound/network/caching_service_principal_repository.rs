use crate::ports::outbound::ServicePrincipalRepository;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// CachingServicePrincipalRepository wraps a ServicePrincipalRepository and
/// remembers every successful lookup for the lifetime of the scan.
///
/// A single resolve pass already issues one lookup per distinct ID, so the
/// cache only pays off when the same repository serves several resolve
/// passes, e.g. a library caller auditing more than one prefix.
///
/// "No match" is cached like a hit; errors are not cached, so a failed
/// lookup may be retried by a later resolve pass.
pub struct CachingServicePrincipalRepository<R: ServicePrincipalRepository> {
    inner: R,
    cache: Arc<DashMap<String, Option<Value>>>,
}

impl<R: ServicePrincipalRepository> CachingServicePrincipalRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Number of cached lookups
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: ServicePrincipalRepository> ServicePrincipalRepository
    for CachingServicePrincipalRepository<R>
{
    async fn find_by_app_id(&self, app_id: &str) -> Result<Option<Value>> {
        if let Some(cached) = self.cache.get(app_id) {
            return Ok(cached.clone());
        }

        let found = self.inner.find_by_app_id(app_id).await?;
        self.cache.insert(app_id.to_string(), found.clone());

        Ok(found)
    }
}
