use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a clean scan,
/// a scan that surfaced risky registrations, and a failed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Scan completed; no findings, or findings were not configured to fail the run
    Success = 0,
    /// At least one application produced a finding and `--fail-on-findings` was set
    FindingsDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (enumeration failure, auth failure, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::FindingsDetected => write!(f, "Findings Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for the registration audit.
///
/// Every variant renders a user-facing message with a hint line. Errors
/// are carried as `anyhow::Error` and recovered with `downcast_ref` where
/// a caller needs to tell them apart (e.g. auth failure vs. transport).
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("No bearer token was supplied\n\n💡 Hint: Pass --token or set the APPREG_AUDIT_TOKEN environment variable")]
    MissingCredential,

    #[error("Access denied by the directory API ({status}) at {endpoint}\n\n💡 Hint: Check that the token is valid and carries Application.Read.All")]
    AccessDenied { status: u16, endpoint: String },

    #[error("Directory API returned status {status} for {endpoint}")]
    ApiError { status: u16, endpoint: String },

    #[error("Failed to enumerate application registrations\nReason: {reason}\n\n💡 Hint: {hint}")]
    EnumerationFailed { reason: String, hint: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    ConfigError { message: String, hint: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl AuditError {
    /// True for errors caused by a rejected or missing credential
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuditError::AccessDenied { .. } | AuditError::MissingCredential
        )
    }
}
