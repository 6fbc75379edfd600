use crate::audit::domain::{ApplicationRegistration, ExpandedPermission, Finding, FindingCategory};
use crate::audit::policies::RiskPolicy;
use chrono::{DateTime, Utc};

/// Hosts that may legitimately receive redirects over plain http
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

const INSECURE_SCHEME: &str = "http://";

/// RiskClassifier evaluates an application against a [`RiskPolicy`].
///
/// Checks run in a fixed order and never short-circuit; the resulting
/// findings are ordered by check. An empty result means the application
/// is clean.
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    policy: RiskPolicy,
}

impl RiskClassifier {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Classifies one application. `now` anchors the credential-expiry check.
    pub fn classify(
        &self,
        app: &ApplicationRegistration,
        expanded: &[ExpandedPermission],
        now: DateTime<Utc>,
    ) -> Vec<Finding> {
        [
            Self::check_implicit_grant(app),
            Self::check_public_client(app),
            Self::check_insecure_redirects(app),
            Self::check_wildcard_redirects(app),
            self.check_high_risk_permissions(expanded),
            Self::check_identifier_uris(app),
            self.check_expiring_credentials(app, now),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn check_implicit_grant(app: &ApplicationRegistration) -> Option<Finding> {
        let access_token = app.implicit_access_token_issuance();
        let id_token = app.implicit_id_token_issuance();
        if !access_token && !id_token {
            return None;
        }

        Some(Finding::new(
            FindingCategory::ImplicitGrant,
            format!(
                "Implicit grant enabled (access token: {}, ID token: {})",
                access_token, id_token
            ),
        ))
    }

    /// The configuration block and both flags are independent indicators;
    /// any one of them marks the application as a public client.
    fn check_public_client(app: &ApplicationRegistration) -> Option<Finding> {
        let mut indicators = Vec::new();
        if app
            .public_client()
            .is_some_and(|pc| !pc.redirect_uris.is_empty())
        {
            indicators.push("public client redirect URIs configured");
        }
        if app.is_fallback_public_client() == Some(true) {
            indicators.push("isFallbackPublicClient");
        }
        if app.allow_public_client() == Some(true) {
            indicators.push("allowPublicClient");
        }

        if indicators.is_empty() {
            return None;
        }

        Some(Finding::new(
            FindingCategory::PublicClient,
            format!("Public client enabled ({})", indicators.join(", ")),
        ))
    }

    fn check_insecure_redirects(app: &ApplicationRegistration) -> Option<Finding> {
        let insecure: Vec<&str> = app.redirect_uris().filter(|uri| is_insecure(uri)).collect();
        if insecure.is_empty() {
            return None;
        }

        Some(Finding::new(
            FindingCategory::InsecureRedirect,
            format!("Insecure (http) redirect URIs: {}", insecure.join(", ")),
        ))
    }

    fn check_wildcard_redirects(app: &ApplicationRegistration) -> Option<Finding> {
        let wildcard: Vec<&str> = app.redirect_uris().filter(|uri| uri.contains('*')).collect();
        if wildcard.is_empty() {
            return None;
        }

        Some(Finding::new(
            FindingCategory::WildcardRedirect,
            format!("Wildcard redirect URIs: {}", wildcard.join(", ")),
        ))
    }

    fn check_high_risk_permissions(&self, expanded: &[ExpandedPermission]) -> Option<Finding> {
        let mut risky: Vec<String> = Vec::new();
        for permission in expanded {
            if self
                .policy
                .is_high_risk(&permission.resource_name, &permission.permission_name)
            {
                let label = permission.to_string();
                if !risky.contains(&label) {
                    risky.push(label);
                }
            }
        }

        if risky.is_empty() {
            return None;
        }

        Some(Finding::new(
            FindingCategory::HighRiskPermission,
            format!("High-risk permissions: {}", risky.join(", ")),
        ))
    }

    fn check_identifier_uris(app: &ApplicationRegistration) -> Option<Finding> {
        let count = app.identifier_uris().len();
        if count == 0 {
            return None;
        }

        Some(Finding::new(
            FindingCategory::ExposedIdentifierUri,
            format!("Exposes {} identifier URI(s)", count),
        ))
    }

    fn check_expiring_credentials(
        &self,
        app: &ApplicationRegistration,
        now: DateTime<Utc>,
    ) -> Option<Finding> {
        let threshold = self.policy.expiry_threshold_days();
        let messages: Vec<String> = app
            .credentials()
            .filter_map(|credential| {
                let days = credential.days_remaining(now)?;
                if days > threshold {
                    return None;
                }
                Some(if days < 0 {
                    format!("{} expired {} day(s) ago", credential.label(), -days)
                } else {
                    format!("{} expires in {} day(s)", credential.label(), days)
                })
            })
            .collect();

        if messages.is_empty() {
            return None;
        }

        Some(Finding::new(
            FindingCategory::ExpiringCredential,
            format!("Expiring credentials: {}", messages.join("; ")),
        ))
    }
}

/// `http://` (case-sensitive) to anything other than a loopback host
fn is_insecure(uri: &str) -> bool {
    let Some(rest) = uri.strip_prefix(INSECURE_SCHEME) else {
        return false;
    };
    !LOOPBACK_HOSTS.contains(&host_of(rest))
}

/// Host part of an authority, port and userinfo removed; IPv6 literals keep
/// their brackets
fn host_of(after_scheme: &str) -> &str {
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or_default();

    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }

    authority.split(':').next().unwrap_or_default()
}
