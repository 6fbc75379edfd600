use std::collections::HashMap;

/// Permission catalog exposed by one resource application's service principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrincipalCatalog {
    app_id: String,
    display_name: Option<String>,
    scopes: HashMap<String, String>,
    app_roles: HashMap<String, String>,
}

impl ServicePrincipalCatalog {
    pub fn new(
        app_id: impl Into<String>,
        display_name: Option<String>,
        scopes: HashMap<String, String>,
        app_roles: HashMap<String, String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            display_name,
            scopes,
            app_roles,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Delegated scope name for a scope GUID
    pub fn scope_name(&self, id: &str) -> Option<&str> {
        self.scopes.get(id).map(String::as_str)
    }

    /// Application role name for a role GUID
    pub fn role_name(&self, id: &str) -> Option<&str> {
        self.app_roles.get(id).map(String::as_str)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn role_count(&self) -> usize {
        self.app_roles.len()
    }
}

/// Lookup of resource application ID to its permission catalog.
///
/// Built once per scan. A missing key means the resource could not be
/// resolved, which is an expected state rather than an error.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    entries: HashMap<String, ServicePrincipalCatalog>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: ServicePrincipalCatalog) {
        self.entries.insert(entry.app_id.clone(), entry);
    }

    pub fn get(&self, resource_app_id: &str) -> Option<&ServicePrincipalCatalog> {
        self.entries.get(resource_app_id)
    }

    pub fn contains(&self, resource_app_id: &str) -> bool {
        self.entries.contains_key(resource_app_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ServicePrincipalCatalog> for PermissionCatalog {
    fn from_iter<I: IntoIterator<Item = ServicePrincipalCatalog>>(iter: I) -> Self {
        let mut catalog = PermissionCatalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}
