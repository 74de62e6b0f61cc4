//! Error types for fsvs-apt-hook modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading the apt transaction log.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to read transaction log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from loading the hook configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from invoking the version-control client.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Failed to spawn {binary}: {source}")]
    SpawnFailed {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{binary} {operation} exited with {}: {stderr}",
            code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit {
        binary: String,
        operation: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Errors from the environment preflight checks.
///
/// Every variant is fatal for the run: it indicates missing setup, not a
/// transient condition.
#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("no instance of fsvs found at {0}")]
    ClientNotInstalled(String),

    #[error("no urls defined for {0}")]
    NoUrlsDefined(PathBuf),

    #[error("no repo available for {root}: {reason}")]
    RepositoryUnreachable { root: PathBuf, reason: String },

    #[error("could not query urls for {root}: {source}")]
    UrlQueryFailed {
        root: PathBuf,
        #[source]
        source: VcsError,
    },
}

/// Errors from the hook pipeline as a whole.
#[derive(Error, Debug)]
pub enum HookError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error("Failed to query working tree status: {0}")]
    Status(#[source] VcsError),

    #[error("Failed to write commit message to {path}: {source}")]
    MessageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Commit failed: {0}")]
    Commit(#[source] VcsError),

    #[error("Failed to prompt for confirmation: {0}")]
    Prompt(#[source] dialoguer::Error),

    #[error("Failed to read confirmation: {0}")]
    ReadAnswer(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}
