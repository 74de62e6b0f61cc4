//! fsvs-apt-hook - commit configuration changes to fsvs after an apt run.
//!
//! # Overview
//!
//! Invoked as an apt `Post-Invoke` hook, fsvs-apt-hook reads the last session
//! from apt's `term.log`, summarises its package actions into a commit
//! message, and, if fsvs reports changed files and the operator agrees,
//! commits the tracked root with that message.

pub mod config;
pub mod error;
pub mod hook;
pub mod log;
pub mod vcs;

// Re-export commonly used types
pub use config::{ConfigOverrides, HookConfig};
pub use error::{ConfigError, HookError, LogError, PreflightError, VcsError};
pub use hook::{DryRunReport, HookOutcome, dry_run, run_hook};
pub use log::Session;
pub use vcs::{FsvsClient, StatusEntry, VcsClient};
