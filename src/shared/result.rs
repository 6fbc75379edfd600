/// Crate-wide result alias.
///
/// Errors travel as `anyhow::Error` so adapters can attach context, while
/// `AuditError` variants stay reachable through `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
