use serde::Serialize;
use std::fmt;

/// Category of a risk finding, in classifier check order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    ImplicitGrant,
    PublicClient,
    InsecureRedirect,
    WildcardRedirect,
    HighRiskPermission,
    ExposedIdentifierUri,
    ExpiringCredential,
}

impl FindingCategory {
    /// Every category, in the order the classifier evaluates them
    pub const ALL: [FindingCategory; 7] = [
        FindingCategory::ImplicitGrant,
        FindingCategory::PublicClient,
        FindingCategory::InsecureRedirect,
        FindingCategory::WildcardRedirect,
        FindingCategory::HighRiskPermission,
        FindingCategory::ExposedIdentifierUri,
        FindingCategory::ExpiringCredential,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FindingCategory::ImplicitGrant => "Implicit grant",
            FindingCategory::PublicClient => "Public client",
            FindingCategory::InsecureRedirect => "Insecure redirect",
            FindingCategory::WildcardRedirect => "Wildcard redirect",
            FindingCategory::HighRiskPermission => "High-risk permission",
            FindingCategory::ExposedIdentifierUri => "Exposed identifier URI",
            FindingCategory::ExpiringCredential => "Expiring credential",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single risk finding for one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub message: String,
}

impl Finding {
    pub fn new(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
