//! appreg-audit - risk auditor for identity-platform application registrations
//!
//! This library enumerates application registrations from a directory API,
//! resolves the service principals their permissions refer to, and flags
//! risky configuration (implicit grant, public clients, insecure or wildcard
//! redirect URIs, high-risk permissions, exposed identifier URIs and
//! expiring credentials). It follows hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`audit`): Pure business logic, domain models and the risk policy
//! - **Application Layer** (`application`): Use cases, DTOs and read models
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use appreg_audit::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let client = GraphClient::new(GraphClientConfig::new("<bearer token>"))?;
//! let service_principals = CachingServicePrincipalRepository::new(client.clone());
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = AuditApplicationsUseCase::new(
//!     client.clone(),
//!     client,
//!     service_principals,
//!     progress_reporter,
//! );
//!
//! // Execute
//! let response = use_case.execute(AuditRequest::new(Some("Contoso".into()))).await?;
//!
//! // Format output
//! let output = JsonReportFormatter::new().format(&response.report)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod audit;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{
        JsonReportFormatter, MarkdownReportFormatter,
    };
    pub use crate::adapters::outbound::network::{
        CachingServicePrincipalRepository, GraphClient, GraphClientConfig,
    };
    pub use crate::application::dto::{AuditRequest, AuditResponse, OutputFormat};
    pub use crate::application::read_models::AuditReport;
    pub use crate::application::use_cases::AuditApplicationsUseCase;
    pub use crate::audit::domain::{
        ApplicationRegistration, ExpandedPermission, Finding, FindingCategory,
    };
    pub use crate::audit::policies::RiskPolicy;
    pub use crate::audit::services::RiskClassifier;
    pub use crate::ports::outbound::{
        ApplicationDirectory, OutputPresenter, PagedApplicationDirectory, ProgressReporter,
        ReportFormatter, ServicePrincipalRepository,
    };
    pub use crate::shared::Result;
}
