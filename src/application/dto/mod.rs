/// Data Transfer Objects for application layer
///
/// DTOs carry data between the CLI, the use cases and the adapters,
/// keeping the audit domain isolated.
mod audit_request;
mod audit_response;
mod enumeration_strategy;
mod output_format;

pub use audit_request::AuditRequest;
pub use audit_response::AuditResponse;
pub use enumeration_strategy::EnumerationStrategy;
pub use output_format::OutputFormat;
