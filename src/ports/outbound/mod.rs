/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach the directory API, the console and the output destination.
pub mod application_directory;
pub mod formatter;
pub mod output_presenter;
pub mod progress_reporter;
pub mod service_principal_repository;

pub use application_directory::{ApplicationDirectory, ApplicationPage, PagedApplicationDirectory};
pub use formatter::ReportFormatter;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use service_principal_repository::ServicePrincipalRepository;
