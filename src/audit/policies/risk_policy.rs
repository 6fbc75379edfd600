use std::collections::BTreeSet;

/// Version tag of the built-in policy
pub const POLICY_VERSION: &str = "2024.1";

/// Version tag reported once any part of the built-in policy is overridden
pub const CUSTOM_POLICY_VERSION: &str = "custom";

/// Display name of the identity-graph resource whose permissions are screened
pub const GRAPH_RESOURCE_NAME: &str = "Microsoft Graph";

/// Credentials expiring within this many days are reported
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: i64 = 30;

/// Graph permissions that grant write or full control over directory
/// objects, mail, files, sites, devices or policy.
const DEFAULT_HIGH_RISK_PERMISSIONS: &[&str] = &[
    "Directory.ReadWrite.All",
    "Directory.AccessAsUser.All",
    "User.ReadWrite.All",
    "Group.ReadWrite.All",
    "GroupMember.ReadWrite.All",
    "Application.ReadWrite.All",
    "Application.ReadWrite.OwnedBy",
    "AppRoleAssignment.ReadWrite.All",
    "RoleManagement.ReadWrite.Directory",
    "Mail.ReadWrite",
    "Mail.Send",
    "Files.ReadWrite.All",
    "Sites.ReadWrite.All",
    "Sites.FullControl.All",
    "Device.ReadWrite.All",
    "Policy.ReadWrite.ConditionalAccess",
    "Policy.ReadWrite.ApplicationConfiguration",
];

/// RiskPolicy encodes the fixed rules the classifier evaluates against.
///
/// The built-in policy is versioned; configuration may replace individual
/// parts, in which case the version becomes [`CUSTOM_POLICY_VERSION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskPolicy {
    version: String,
    graph_resource_name: String,
    high_risk_permissions: BTreeSet<String>,
    expiry_threshold_days: i64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            graph_resource_name: GRAPH_RESOURCE_NAME.to_string(),
            high_risk_permissions: DEFAULT_HIGH_RISK_PERMISSIONS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            expiry_threshold_days: DEFAULT_EXPIRY_THRESHOLD_DAYS,
        }
    }
}

impl RiskPolicy {
    /// Replaces the high-risk permission list; entries are trimmed and blanks dropped
    pub fn with_high_risk_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.high_risk_permissions = permissions
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self.version = CUSTOM_POLICY_VERSION.to_string();
        self
    }

    pub fn with_graph_resource_name(mut self, name: impl AsRef<str>) -> Self {
        self.graph_resource_name = name.as_ref().trim().to_string();
        self.version = CUSTOM_POLICY_VERSION.to_string();
        self
    }

    pub fn with_expiry_threshold_days(mut self, days: i64) -> Self {
        self.expiry_threshold_days = days;
        self.version = CUSTOM_POLICY_VERSION.to_string();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn graph_resource_name(&self) -> &str {
        &self.graph_resource_name
    }

    pub fn expiry_threshold_days(&self) -> i64 {
        self.expiry_threshold_days
    }

    pub fn high_risk_permissions(&self) -> &BTreeSet<String> {
        &self.high_risk_permissions
    }

    /// True when `permission_name` on `resource_name` is on the high-risk list
    pub fn is_high_risk(&self, resource_name: &str, permission_name: &str) -> bool {
        resource_name == self.graph_resource_name
            && self.high_risk_permissions.contains(permission_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_versioned() {
        let policy = RiskPolicy::default();
        assert_eq!(policy.version(), POLICY_VERSION);
        assert_eq!(policy.graph_resource_name(), "Microsoft Graph");
        assert_eq!(policy.expiry_threshold_days(), 30);
        assert_eq!(
            policy.high_risk_permissions().len(),
            DEFAULT_HIGH_RISK_PERMISSIONS.len()
        );
    }

    #[test]
    fn test_is_high_risk_requires_graph_resource() {
        let policy = RiskPolicy::default();
        assert!(policy.is_high_risk("Microsoft Graph", "Directory.ReadWrite.All"));
        assert!(!policy.is_high_risk("Microsoft Graph", "User.Read"));
        assert!(!policy.is_high_risk("Contoso API", "Directory.ReadWrite.All"));
    }

    #[test]
    fn test_is_high_risk_is_case_sensitive() {
        let policy = RiskPolicy::default();
        assert!(!policy.is_high_risk("microsoft graph", "Directory.ReadWrite.All"));
        assert!(!policy.is_high_risk("Microsoft Graph", "directory.readwrite.all"));
    }

    #[test]
    fn test_override_marks_policy_custom() {
        let policy = RiskPolicy::default().with_high_risk_permissions(["User.Read"]);
        assert_eq!(policy.version(), CUSTOM_POLICY_VERSION);
        assert!(policy.is_high_risk("Microsoft Graph", "User.Read"));
        assert!(!policy.is_high_risk("Microsoft Graph", "Directory.ReadWrite.All"));
    }

    #[test]
    fn test_override_entries_are_trimmed() {
        let policy = RiskPolicy::default()
            .with_high_risk_permissions([" Mail.Send", "Sites.FullControl.All\t", "  "])
            .with_graph_resource_name(" Microsoft Graph ");
        assert_eq!(policy.high_risk_permissions().len(), 2);
        assert!(policy.is_high_risk("Microsoft Graph", "Mail.Send"));
        assert!(policy.is_high_risk("Microsoft Graph", "Sites.FullControl.All"));
    }

    #[test]
    fn test_override_threshold_and_resource_name() {
        let policy = RiskPolicy::default()
            .with_expiry_threshold_days(60)
            .with_graph_resource_name("Graph (Sovereign)");
        assert_eq!(policy.expiry_threshold_days(), 60);
        assert!(policy.is_high_risk("Graph (Sovereign)", "Mail.Send"));
    }
}
