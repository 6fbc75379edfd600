use crate::shared::Result;
use async_trait::async_trait;
use serde_json::Value;

/// ServicePrincipalRepository port for looking up resource applications
///
/// Implementations must be `Send + Sync`; the resolver issues lookups
/// concurrently.
#[async_trait]
pub trait ServicePrincipalRepository: Send + Sync {
    /// Finds the service principal whose `appId` equals `app_id`
    ///
    /// # Returns
    /// The first matching raw payload, or `None` when nothing matched
    ///
    /// # Errors
    /// Transport and API failures. Callers treat these as "unresolved".
    async fn find_by_app_id(&self, app_id: &str) -> Result<Option<Value>>;
}
