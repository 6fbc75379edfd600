use crate::audit::domain::{
    ApplicationRegistration, Credential, CredentialKind, PermissionKind, PublicClientConfig,
    RequiredResourceAccess, ResourceAccess, ServicePrincipalCatalog,
};
use serde_json::Value;
use std::collections::HashMap;

/// ApplicationNormalizer turns raw directory payloads into canonical records.
///
/// Backends disagree on field casing (`appId` from the REST API, `AppId`
/// from SDK-shaped exports) and on which optional blocks are present. This
/// is the only place that knows about those differences: every field is
/// looked up once here and downstream code reads plain Rust values.
///
/// Normalization never fails. Missing, null or mistyped values become the
/// field's absent value.
pub struct ApplicationNormalizer;

impl ApplicationNormalizer {
    /// Normalizes one application registration payload, keeping the payload
    /// itself for audit traceability
    pub fn normalize(raw: Value) -> ApplicationRegistration {
        let web = field(&raw, "web");
        let implicit_grant = web.and_then(|w| field(w, "implicitGrantSettings"));
        let spa = field(&raw, "spa");

        let implicit_access_token_issuance = implicit_grant
            .and_then(|ig| bool_field(ig, "enableAccessTokenIssuance"))
            .or_else(|| bool_field(&raw, "oauth2AllowImplicitFlow"))
            .unwrap_or(false);
        let implicit_id_token_issuance = implicit_grant
            .and_then(|ig| bool_field(ig, "enableIdTokenIssuance"))
            .or_else(|| bool_field(&raw, "oauth2AllowIdTokenImplicitFlow"))
            .unwrap_or(false);

        let public_client = field(&raw, "publicClient")
            .filter(|pc| pc.is_object())
            .map(|pc| PublicClientConfig {
                redirect_uris: string_list(pc, "redirectUris"),
            });

        ApplicationRegistration {
            app_id: string_field(&raw, "appId"),
            object_id: string_field(&raw, "id"),
            display_name: string_field(&raw, "displayName"),
            sign_in_audience: string_field(&raw, "signInAudience"),
            web_redirect_uris: web
                .map(|w| string_list(w, "redirectUris"))
                .unwrap_or_default(),
            spa_redirect_uris: spa
                .map(|s| string_list(s, "redirectUris"))
                .unwrap_or_default(),
            implicit_access_token_issuance,
            implicit_id_token_issuance,
            public_client,
            is_fallback_public_client: bool_field(&raw, "isFallbackPublicClient"),
            allow_public_client: bool_field(&raw, "allowPublicClient"),
            known_client_applications: string_list(&raw, "knownClientApplications"),
            has_optional_claims: has_optional_claims(&raw),
            identifier_uris: string_list(&raw, "identifierUris"),
            password_credentials: credentials(&raw, "passwordCredentials", CredentialKind::Secret),
            key_credentials: credentials(&raw, "keyCredentials", CredentialKind::Certificate),
            required_resource_access: required_resource_access(&raw),
            raw,
        }
    }

    /// Trimmed display name of a raw payload, under either casing
    pub fn display_name(raw: &Value) -> Option<String> {
        string_field(raw, "displayName")
    }

    /// Normalizes a service principal payload into its permission catalog.
    ///
    /// The entry is keyed by the identifier that was looked up so catalog
    /// lookups always match the requesting application's reference.
    pub fn normalize_service_principal(
        requested_app_id: &str,
        raw: &Value,
    ) -> ServicePrincipalCatalog {
        let scopes = first_array(raw, &["oauth2PermissionScopes", "oauth2Permissions"]);
        let roles = first_array(raw, &["appRoles"]);

        ServicePrincipalCatalog::new(
            requested_app_id,
            string_field(raw, "displayName"),
            permission_map(scopes),
            permission_map(roles),
        )
    }
}

/// Looks a field up under its lower-camel name, its upper-camel variant,
/// then any case-insensitive match. Null values count as absent.
fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let object = value.as_object()?;

    let upper = upper_camel(key);
    object
        .get(key)
        .filter(|v| !v.is_null())
        .or_else(|| object.get(&upper).filter(|v| !v.is_null()))
        .or_else(|| {
            object
                .iter()
                .find(|(k, v)| k.eq_ignore_ascii_case(key) && !v.is_null())
                .map(|(_, v)| v)
        })
}

fn upper_camel(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    field(value, key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn bool_field(value: &Value, key: &str) -> Option<bool> {
    match field(value, key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// String array field; a bare string counts as a single-element list and
/// non-string or blank items are dropped
fn string_list(value: &Value, key: &str) -> Vec<String> {
    match field(value, key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    field(value, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn first_array<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .map(|key| array(value, key))
        .find(|items| !items.is_empty())
        .unwrap_or(&[])
}

fn has_optional_claims(raw: &Value) -> bool {
    field(raw, "optionalClaims").is_some_and(|claims| {
        ["idToken", "accessToken", "saml2Token"]
            .iter()
            .any(|token| !array(claims, token).is_empty())
    })
}

fn credentials(raw: &Value, key: &str, kind: CredentialKind) -> Vec<Credential> {
    array(raw, key)
        .iter()
        .filter(|item| item.is_object())
        .map(|item| {
            let expires_at = ["endDateTime", "endDate"]
                .iter()
                .find_map(|k| field(item, k).and_then(Value::as_str))
                .and_then(Credential::parse_expiry);
            Credential::new(kind, string_field(item, "displayName"), expires_at)
        })
        .collect()
}

fn required_resource_access(raw: &Value) -> Vec<RequiredResourceAccess> {
    array(raw, "requiredResourceAccess")
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| {
            let resource_app_id = string_field(entry, "resourceAppId").unwrap_or_default();
            let access = array(entry, "resourceAccess")
                .iter()
                .filter_map(|item| {
                    let id = string_field(item, "id")?;
                    let kind = field(item, "type")
                        .and_then(Value::as_str)
                        .map(PermissionKind::from_raw)
                        .unwrap_or_else(|| PermissionKind::Other(String::new()));
                    Some(ResourceAccess::new(id, kind))
                })
                .collect();
            RequiredResourceAccess::new(resource_app_id, access)
        })
        .collect()
}

/// GUID -> name map for scopes or app roles; the `value` claim is preferred,
/// the display name is used for roles that carry no value
fn permission_map(items: &[Value]) -> HashMap<String, String> {
    items
        .iter()
        .filter_map(|item| {
            let id = string_field(item, "id")?;
            let name = string_field(item, "value")
                .or_else(|| string_field(item, "adminConsentDisplayName"))
                .or_else(|| string_field(item, "displayName"))?;
            Some((id, name))
        })
        .collect()
}
