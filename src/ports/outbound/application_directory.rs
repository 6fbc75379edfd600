use crate::shared::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One page of a paged application listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPage {
    /// Raw application payloads, in the order the backend returned them
    pub items: Vec<Value>,
    /// Continuation link for the next page; `None` on the last page
    pub next_link: Option<String>,
}

impl ApplicationPage {
    pub fn new(items: Vec<Value>, next_link: Option<String>) -> Self {
        Self { items, next_link }
    }
}

/// ApplicationDirectory port for the primary enumeration backend
///
/// `filter` is an optional display-name prefix; implementations embed it in
/// their query after escaping.
#[async_trait]
pub trait ApplicationDirectory: Send + Sync {
    /// Fetches every application the backend will return in one call
    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<Value>>;

    /// Fetches a single page of at most `cap` applications
    async fn fetch_top(&self, filter: Option<&str>, cap: usize) -> Result<Vec<Value>>;
}

/// PagedApplicationDirectory port for the continuation-token backend
#[async_trait]
pub trait PagedApplicationDirectory: Send + Sync {
    /// Fetches one page. `continuation` is the previous page's `next_link`,
    /// or `None` for the first page.
    ///
    /// # Errors
    /// Any failure is fatal to the enumeration that requested the page.
    async fn fetch_page(
        &self,
        filter: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ApplicationPage>;
}
