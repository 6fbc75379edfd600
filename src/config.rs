//! Configuration file support for appreg-audit.
//!
//! Provides YAML-based configuration through `appreg-audit.config.yml` files,
//! including data structures, file loading, and validation. The bearer token
//! is deliberately not a config field; it comes from the CLI or environment.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::application::dto::OutputFormat;
use crate::shared::error::AuditError;
use crate::shared::security::{
    validate_endpoint_url, validate_file_size, validate_regular_file, MAX_CONFIG_FILE_SIZE,
};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "appreg-audit.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub filter: Option<String>,
    pub endpoint: Option<String>,
    pub secondary_endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub lookup_timeout_secs: Option<u64>,
    pub max_concurrent_lookups: Option<usize>,
    pub expiry_threshold_days: Option<i64>,
    pub graph_resource_name: Option<String>,
    pub high_risk_permissions: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Parsed `format` field, if present
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(|f| {
                f.parse::<OutputFormat>()
                    .map_err(|e| config_error(e, "Use 'json' or 'markdown'."))
            })
            .transpose()
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    validate_regular_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?
        .len();
    validate_file_size(size, path, MAX_CONFIG_FILE_SIZE)?;

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn config_error(message: impl Into<String>, hint: impl Into<String>) -> anyhow::Error {
    AuditError::ConfigError {
        message: message.into(),
        hint: hint.into(),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    config.output_format()?;

    for (field, value) in [
        ("endpoint", &config.endpoint),
        ("secondary_endpoint", &config.secondary_endpoint),
    ] {
        if let Some(url) = value {
            validate_endpoint_url(url).map_err(|e| {
                config_error(
                    format!("{}: {}", field, e),
                    "Endpoints must be https URLs (plain http is allowed for localhost only).",
                )
            })?;
        }
    }

    for (field, value) in [
        ("request_timeout_secs", config.request_timeout_secs),
        ("lookup_timeout_secs", config.lookup_timeout_secs),
    ] {
        if value == Some(0) {
            return Err(config_error(
                format!("{} must be greater than 0", field),
                "Use a timeout of at least one second.",
            ));
        }
    }

    if config.max_concurrent_lookups == Some(0) {
        return Err(config_error(
            "max_concurrent_lookups must be greater than 0",
            "Use 1 to resolve service principals sequentially.",
        ));
    }

    if let Some(days) = config.expiry_threshold_days {
        if days < 0 {
            return Err(config_error(
                format!("expiry_threshold_days must not be negative (got {})", days),
                "Use 0 to report only credentials that have already expired.",
            ));
        }
    }

    if let Some(ref permissions) = config.high_risk_permissions {
        for (i, permission) in permissions.iter().enumerate() {
            if permission.trim().is_empty() {
                return Err(config_error(
                    format!("high_risk_permissions[{}] must not be empty", i),
                    "Each entry must be a permission name such as \"Directory.ReadWrite.All\".",
                ));
            }
        }
    }

    if let Some(ref name) = config.graph_resource_name {
        if name.trim().is_empty() {
            return Err(config_error(
                "graph_resource_name must not be empty",
                "Remove the field to use the default resource name.",
            ));
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "unknown config field will be ignored");
    }
}
