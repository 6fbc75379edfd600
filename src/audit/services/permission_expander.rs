use crate::audit::domain::{
    ExpandedPermission, PermissionCatalog, PermissionKind, RequiredResourceAccess,
};

/// PermissionExpander translates raw required-access entries into names.
///
/// Anything the catalog cannot resolve keeps its raw identifier, so a
/// partially failed resolve never blocks expansion or classification.
pub struct PermissionExpander;

impl PermissionExpander {
    /// Expands every (resource, permission) pair, preserving input order
    pub fn expand(
        entries: &[RequiredResourceAccess],
        catalog: &PermissionCatalog,
    ) -> Vec<ExpandedPermission> {
        entries
            .iter()
            .flat_map(|entry| {
                let resource = catalog.get(&entry.resource_app_id);
                let resource_name = resource
                    .and_then(|r| r.display_name())
                    .unwrap_or(&entry.resource_app_id);

                entry.resource_access.iter().map(move |access| {
                    let resolved = resource.and_then(|r| match access.kind {
                        PermissionKind::DelegatedScope => r.scope_name(&access.id),
                        PermissionKind::ApplicationRole => r.role_name(&access.id),
                        PermissionKind::Other(_) => None,
                    });

                    ExpandedPermission::new(
                        entry.resource_app_id.as_str(),
                        resource_name,
                        access.kind.clone(),
                        resolved.unwrap_or(&access.id),
                    )
                })
            })
            .collect()
    }
}
