use crate::ports::outbound::OutputPresenter;
use crate::shared::error::AuditError;
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter for writing the report to a file
///
/// Refuses to write through a symbolic link and requires the parent
/// directory to exist already.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn validate_parent_directory(&self) -> Result<()> {
        let Some(parent) = self.output_path.parent() else {
            return Ok(());
        };
        if parent == Path::new("") {
            return Ok(());
        }

        if !parent.is_dir() {
            return Err(AuditError::FileWriteError {
                path: self.output_path.clone(),
                details: format!("Parent directory does not exist: {}", parent.display()),
            }
            .into());
        }

        parent.canonicalize().map_err(|e| AuditError::FileWriteError {
            path: self.output_path.clone(),
            details: format!("Failed to validate parent directory: {}", e),
        })?;
        Ok(())
    }

    fn validate_not_symlink(&self) -> Result<()> {
        let metadata = match fs::symlink_metadata(&self.output_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(AuditError::FileWriteError {
                    path: self.output_path.clone(),
                    details: format!("Failed to read file metadata: {}", e),
                }
                .into())
            }
        };

        if metadata.is_symlink() {
            return Err(AuditError::SecurityError {
                path: self.output_path.clone(),
                reason: "Output path is a symbolic link".to_string(),
                hint: "Write the report to a regular file path instead".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.validate_parent_directory()?;
        self.validate_not_symlink()?;

        fs::write(&self.output_path, content).map_err(|e| AuditError::FileWriteError {
            path: self.output_path.clone(),
            details: e.to_string(),
        })?;

        eprintln!("✅ Report written to: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing the report to stdout
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| {
                if content.ends_with('\n') {
                    Ok(())
                } else {
                    stdout.write_all(b"\n")
                }
            })
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}
