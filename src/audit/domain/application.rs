use super::credential::Credential;
use serde::{Serialize, Serializer};

/// Permission kind requested on a resource application
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    /// User-delegated permission (`Scope`)
    DelegatedScope,
    /// Application-only permission (`Role`)
    ApplicationRole,
    /// Any kind string the directory emits that is not recognized
    Other(String),
}

impl PermissionKind {
    /// Maps the directory's raw type string (`Scope` / `Role`) to a kind
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scope" => PermissionKind::DelegatedScope,
            "role" => PermissionKind::ApplicationRole,
            _ => PermissionKind::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PermissionKind::DelegatedScope => "Scope",
            PermissionKind::ApplicationRole => "Role",
            PermissionKind::Other(raw) => raw,
        }
    }
}

impl Serialize for PermissionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single (permission identifier, kind) pair inside a required-access entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAccess {
    pub id: String,
    pub kind: PermissionKind,
}

impl ResourceAccess {
    pub fn new(id: impl Into<String>, kind: PermissionKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Permissions an application requests on one resource application.
///
/// Permission identifiers are only meaningful within `resource_app_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredResourceAccess {
    pub resource_app_id: String,
    pub resource_access: Vec<ResourceAccess>,
}

impl RequiredResourceAccess {
    pub fn new(resource_app_id: impl Into<String>, resource_access: Vec<ResourceAccess>) -> Self {
        Self {
            resource_app_id: resource_app_id.into(),
            resource_access,
        }
    }
}

/// Public-client (native / mobile) platform block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicClientConfig {
    pub redirect_uris: Vec<String>,
}

/// Canonical, read-only snapshot of an application registration.
///
/// Built once per scan by `ApplicationNormalizer`; every optional field
/// carries its "absent" value rather than failing the record.
#[derive(Debug, Clone)]
pub struct ApplicationRegistration {
    pub(crate) app_id: Option<String>,
    pub(crate) object_id: Option<String>,
    pub(crate) display_name: Option<String>,
    pub(crate) sign_in_audience: Option<String>,
    pub(crate) web_redirect_uris: Vec<String>,
    pub(crate) spa_redirect_uris: Vec<String>,
    pub(crate) implicit_access_token_issuance: bool,
    pub(crate) implicit_id_token_issuance: bool,
    pub(crate) public_client: Option<PublicClientConfig>,
    pub(crate) is_fallback_public_client: Option<bool>,
    pub(crate) allow_public_client: Option<bool>,
    pub(crate) known_client_applications: Vec<String>,
    pub(crate) has_optional_claims: bool,
    pub(crate) identifier_uris: Vec<String>,
    pub(crate) password_credentials: Vec<Credential>,
    pub(crate) key_credentials: Vec<Credential>,
    pub(crate) required_resource_access: Vec<RequiredResourceAccess>,
    pub(crate) raw: serde_json::Value,
}

impl ApplicationRegistration {
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Display name, falling back to the application ID
    pub fn label(&self) -> &str {
        self.display_name()
            .filter(|name| !name.is_empty())
            .or(self.app_id())
            .unwrap_or("(unknown application)")
    }

    pub fn sign_in_audience(&self) -> Option<&str> {
        self.sign_in_audience.as_deref()
    }

    pub fn web_redirect_uris(&self) -> &[String] {
        &self.web_redirect_uris
    }

    pub fn spa_redirect_uris(&self) -> &[String] {
        &self.spa_redirect_uris
    }

    /// Web redirect URIs followed by SPA redirect URIs; duplicates kept
    pub fn redirect_uris(&self) -> impl Iterator<Item = &str> {
        self.web_redirect_uris
            .iter()
            .chain(self.spa_redirect_uris.iter())
            .map(String::as_str)
    }

    pub fn implicit_access_token_issuance(&self) -> bool {
        self.implicit_access_token_issuance
    }

    pub fn implicit_id_token_issuance(&self) -> bool {
        self.implicit_id_token_issuance
    }

    pub fn public_client(&self) -> Option<&PublicClientConfig> {
        self.public_client.as_ref()
    }

    pub fn is_fallback_public_client(&self) -> Option<bool> {
        self.is_fallback_public_client
    }

    pub fn allow_public_client(&self) -> Option<bool> {
        self.allow_public_client
    }

    pub fn known_client_applications(&self) -> &[String] {
        &self.known_client_applications
    }

    pub fn has_optional_claims(&self) -> bool {
        self.has_optional_claims
    }

    pub fn identifier_uris(&self) -> &[String] {
        &self.identifier_uris
    }

    pub fn password_credentials(&self) -> &[Credential] {
        &self.password_credentials
    }

    pub fn key_credentials(&self) -> &[Credential] {
        &self.key_credentials
    }

    /// Secrets followed by certificates
    pub fn credentials(&self) -> impl Iterator<Item = &Credential> {
        self.password_credentials
            .iter()
            .chain(self.key_credentials.iter())
    }

    pub fn required_resource_access(&self) -> &[RequiredResourceAccess] {
        &self.required_resource_access
    }

    /// The untouched payload the record was normalized from
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}
