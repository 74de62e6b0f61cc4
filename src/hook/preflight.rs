//! Environment checks run before the hook touches anything.
//!
//! Each failure means the machine is not set up for the hook (no fsvs, no
//! URLs, no repository), so nothing is retried.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::HookConfig;
use crate::error::PreflightError;
use crate::vcs::VcsClient;

/// Run all preflight checks.
///
/// Checks (in order):
/// 1. fsvs binary installed
/// 2. URLs configured for the tracked root
/// 3. Repository reachable
pub fn run_checks<V: VcsClient + ?Sized>(
    config: &HookConfig,
    vcs: &V,
) -> Result<(), PreflightError> {
    let binary = check_client_installed(&config.vcs_binary)?;
    debug!("Found fsvs at {}", binary.display());

    check_urls_defined(&config.tracked_root, vcs)?;
    check_repository_reachable(&config.tracked_root, vcs)?;

    Ok(())
}

/// Locate the fsvs binary.
///
/// A value containing a path separator must exist as given; a bare name is
/// resolved through `PATH` with the `which` crate.
pub fn check_client_installed(binary: &str) -> Result<PathBuf, PreflightError> {
    let path = Path::new(binary);
    if binary.contains(std::path::MAIN_SEPARATOR) {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(PreflightError::ClientNotInstalled(binary.to_string()));
    }

    which::which(binary).map_err(|_| PreflightError::ClientNotInstalled(binary.to_string()))
}

/// Check that at least one URL is configured for `root`.
fn check_urls_defined<V: VcsClient + ?Sized>(root: &Path, vcs: &V) -> Result<(), PreflightError> {
    let urls = vcs
        .urls_dump(root)
        .map_err(|source| PreflightError::UrlQueryFailed {
            root: root.to_path_buf(),
            source,
        })?;

    if urls.trim().is_empty() {
        return Err(PreflightError::NoUrlsDefined(root.to_path_buf()));
    }

    debug!("URLs for {}: {}", root.display(), urls.trim());
    Ok(())
}

/// Probe the repository behind `root`.
fn check_repository_reachable<V: VcsClient + ?Sized>(
    root: &Path,
    vcs: &V,
) -> Result<(), PreflightError> {
    vcs.remote_status(root)
        .map_err(|e| PreflightError::RepositoryUnreachable {
            root: root.to_path_buf(),
            reason: e.to_string(),
        })
}
