use super::application::PermissionKind;
use serde::Serialize;
use std::fmt;

/// A required permission translated into human-readable names.
///
/// Unresolved parts carry the raw identifier instead of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedPermission {
    pub resource_app_id: String,
    pub resource_name: String,
    pub kind: PermissionKind,
    pub permission_name: String,
}

impl ExpandedPermission {
    pub fn new(
        resource_app_id: impl Into<String>,
        resource_name: impl Into<String>,
        kind: PermissionKind,
        permission_name: impl Into<String>,
    ) -> Self {
        Self {
            resource_app_id: resource_app_id.into(),
            resource_name: resource_name.into(),
            kind,
            permission_name: permission_name.into(),
        }
    }
}

impl fmt::Display for ExpandedPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_name, self.permission_name)
    }
}
