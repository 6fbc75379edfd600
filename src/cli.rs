use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::OutputFormat;

/// Environment variable holding the bearer token
pub const TOKEN_ENV_VAR: &str = "APPREG_AUDIT_TOKEN";

/// Audit application registrations for risky configuration
#[derive(Parser, Debug)]
#[command(name = "appreg-audit")]
#[command(version)]
#[command(
    about = "Audit identity-platform application registrations for risky configuration",
    long_about = None
)]
pub struct Args {
    /// Only audit applications whose display name starts with this prefix
    #[arg(short = 'n', long, value_name = "PREFIX")]
    pub filter: Option<String>,

    /// Output format: json or markdown [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a configuration file (defaults to ./appreg-audit.config.yml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bearer token for the directory API
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the primary directory API
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Base URL of the paged (secondary) directory API
    #[arg(long, value_name = "URL")]
    pub secondary_endpoint: Option<String>,

    /// Maximum number of service principal lookups in flight
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_concurrent_lookups: Option<u16>,

    /// Exit with code 1 when any application has a finding
    #[arg(long)]
    pub fail_on_findings: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
