/// Outbound adapters: directory API, console, formatters and file output
pub mod console;
pub mod filesystem;
pub mod formatters;
pub mod network;
