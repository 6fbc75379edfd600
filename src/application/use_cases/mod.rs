/// Use cases module containing application business logic orchestration
mod audit_applications;
mod enumerate_applications;
mod resolve_service_principals;

pub use audit_applications::AuditApplicationsUseCase;
pub use enumerate_applications::{EnumerateApplicationsUseCase, EnumerationOutcome, TOP_CAP};
pub use resolve_service_principals::{
    Resolution, ResolveServicePrincipalsUseCase, DEFAULT_LOOKUP_TIMEOUT,
    DEFAULT_MAX_CONCURRENT_LOOKUPS,
};
