//! fsvs client: every operation shells out to the configured `fsvs` binary.
//!
//! Queries capture output; the commit inherits the terminal so fsvs can
//! show progress and ask for credentials.

use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::VcsError;

use super::{StatusEntry, VcsClient, parse_status_output};

/// [`VcsClient`] backed by the `fsvs` command-line client.
#[derive(Debug, Clone)]
pub struct FsvsClient {
    binary: String,
}

impl FsvsClient {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run fsvs with captured output, failing on a non-zero exit.
    fn run(&self, args: &[&str], operation: &str) -> Result<Output, VcsError> {
        debug!("Running {} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| VcsError::SpawnFailed {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::NonZeroExit {
                binary: self.binary.clone(),
                operation: operation.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl VcsClient for FsvsClient {
    fn urls_dump(&self, root: &Path) -> Result<String, VcsError> {
        let root = root.to_string_lossy();
        let output = self.run(&[&*root, "urls", "dump"], "urls dump")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn remote_status(&self, root: &Path) -> Result<(), VcsError> {
        let root = root.to_string_lossy();
        self.run(&[&*root, "remote-status"], "remote-status")?;
        Ok(())
    }

    fn status(&self, root: &Path) -> Result<Vec<StatusEntry>, VcsError> {
        let root = root.to_string_lossy();
        let output = self.run(&["status", &*root], "status")?;
        Ok(parse_status_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn commit(&self, root: &Path, message_file: &Path) -> Result<(), VcsError> {
        let root = root.to_string_lossy();
        let message_file = message_file.to_string_lossy();
        debug!("Running {} commit {} -F {}", self.binary, root, message_file);

        let status = Command::new(&self.binary)
            .args(["commit", &*root, "-F", &*message_file])
            .status()
            .map_err(|source| VcsError::SpawnFailed {
                binary: self.binary.clone(),
                source,
            })?;

        if !status.success() {
            return Err(VcsError::NonZeroExit {
                binary: self.binary.clone(),
                operation: "commit".to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(())
    }
}
