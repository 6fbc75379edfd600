use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

const SECONDS_PER_DAY: i64 = 86_400;

/// Naive timestamp layouts accepted in addition to RFC 3339.
/// Values without an offset are interpreted as UTC.
const NAIVE_EXPIRY_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Kind of credential attached to an application registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Client secret (password credential)
    Secret,
    /// Certificate (key credential)
    Certificate,
}

impl CredentialKind {
    pub fn label(&self) -> &'static str {
        match self {
            CredentialKind::Secret => "Secret",
            CredentialKind::Certificate => "Certificate",
        }
    }
}

/// Credential value object: a secret or certificate with an optional expiry
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    kind: CredentialKind,
    display_name: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(
        kind: CredentialKind,
        display_name: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            kind,
            display_name,
            expires_at,
        }
    }

    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whole days until expiry, rounded toward negative infinity.
    ///
    /// Negative for credentials that already expired. `None` when the
    /// expiry is unknown.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at
            .map(|expiry| (expiry - now).num_seconds().div_euclid(SECONDS_PER_DAY))
    }

    /// Human-readable label, e.g. `Secret 'ci-deploy'` or `Certificate (unnamed)`
    pub fn label(&self) -> String {
        match self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            Some(name) => format!("{} '{}'", self.kind.label(), name),
            None => format!("{} (unnamed)", self.kind.label()),
        }
    }

    /// Parses an expiry timestamp as emitted by the directory API.
    ///
    /// Returns `None` for anything unparsable; an unknown expiry is never an error.
    pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }

        NAIVE_EXPIRY_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}
