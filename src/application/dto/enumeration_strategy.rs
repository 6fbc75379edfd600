use serde::Serialize;
use std::fmt;

/// Which enumeration backend produced the application list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationStrategy {
    /// Single unbounded fetch from the primary backend
    BulkFetch,
    /// One capped page from the primary backend
    SinglePage,
    /// Continuation-token pagination against the secondary backend
    Paginated,
}

impl EnumerationStrategy {
    pub fn description(&self) -> &'static str {
        match self {
            EnumerationStrategy::BulkFetch => "bulk fetch",
            EnumerationStrategy::SinglePage => "single capped page",
            EnumerationStrategy::Paginated => "paginated fetch",
        }
    }
}

impl fmt::Display for EnumerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
