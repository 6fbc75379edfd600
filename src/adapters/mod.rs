/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: the directory REST
/// client, console progress, report formatters and output destinations.
pub mod outbound;
