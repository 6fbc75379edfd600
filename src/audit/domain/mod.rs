pub mod application;
pub mod catalog;
pub mod credential;
pub mod finding;
pub mod permission;
pub mod scan_metadata;

pub use application::{
    ApplicationRegistration, PermissionKind, PublicClientConfig, RequiredResourceAccess,
    ResourceAccess,
};
pub use catalog::{PermissionCatalog, ServicePrincipalCatalog};
pub use credential::{Credential, CredentialKind};
pub use finding::{Finding, FindingCategory};
pub use permission::ExpandedPermission;
pub use scan_metadata::ScanMetadata;
