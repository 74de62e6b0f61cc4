//! Version-control client seam.
//!
//! The hook never versions anything itself; it drives an external client
//! (fsvs) through the [`VcsClient`] trait so the pipeline can be tested
//! against a mock.

pub mod fsvs;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::VcsError;

pub use fsvs::FsvsClient;

/// One line of status output, naming one changed path.
///
/// Status codes are not interpreted; the line is shown to the operator
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusEntry(pub String);

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split raw status output into entries, one per non-blank line.
pub fn parse_status_output(output: &str) -> Vec<StatusEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| StatusEntry(line.to_string()))
        .collect()
}

/// Operations the hook needs from the version-control client.
#[cfg_attr(test, mockall::automock)]
pub trait VcsClient {
    /// Dump the URLs configured for `root`. Empty output means none.
    fn urls_dump(&self, root: &Path) -> Result<String, VcsError>;

    /// Probe the repository behind `root`; `Ok` means it is reachable.
    fn remote_status(&self, root: &Path) -> Result<(), VcsError>;

    /// List changed paths under `root`.
    fn status(&self, root: &Path) -> Result<Vec<StatusEntry>, VcsError>;

    /// Commit `root`, reading the message from `message_file`.
    fn commit(&self, root: &Path, message_file: &Path) -> Result<(), VcsError>;
}
