use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum configuration file size (1 MB)
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path doesn't exist, is a symbolic link, or is
/// not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Validates an API endpoint before a bearer token is ever sent to it.
///
/// Only `https://` endpoints are accepted, except plain `http://` against a
/// loopback host (local mocks and proxies).
pub fn validate_endpoint_url(endpoint: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(endpoint)
        .map_err(|e| anyhow::anyhow!("Invalid endpoint URL '{}': {}", endpoint, e))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => match parsed.host_str() {
            Some("localhost") | Some("127.0.0.1") | Some("[::1]") => Ok(()),
            _ => anyhow::bail!(
                "Security: endpoint '{}' uses plain http. Bearer tokens are only sent over https (or to a loopback host).",
                endpoint
            ),
        },
        other => anyhow::bail!(
            "Endpoint '{}' uses unsupported scheme '{}'",
            endpoint,
            other
        ),
    }
}
