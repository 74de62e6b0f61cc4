//! Hook pipeline: turn the last apt session into an fsvs commit.
//!
//! Orchestrates preflight checks, commit message composition, working tree
//! status, operator confirmation and the commit itself. Runs once per
//! invocation, strictly in order.

pub mod message;
pub mod preflight;
pub mod prompt;

use std::io::Write;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::HookConfig;
use crate::error::HookError;
use crate::log::{Session, filter_actions, read_last_session};
use crate::vcs::{StatusEntry, VcsClient};

use self::message::CommitMessage;
use self::prompt::{COMMIT_QUESTION, Confirmer};

/// How a hook run ended. Every variant is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The tracked root has no changes; nothing was asked or committed.
    NoChanges,
    /// The operator did not accept the commit.
    Declined,
    /// The commit ran and succeeded.
    Committed,
}

/// What a run would do, without prompting or committing.
#[derive(Debug, Serialize)]
pub struct DryRunReport {
    pub session: Session,
    pub message: Vec<String>,
    pub status: Vec<StatusEntry>,
    pub would_prompt: bool,
}

impl DryRunReport {
    /// Pretty-printed JSON, as shown by `--dry-run --json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Read the last apt session and build the commit message from it.
///
/// An unreadable log is reported and treated as a session without actions,
/// so a missing or rotated log never blocks the commit decision.
pub fn compose_message(config: &HookConfig) -> (Session, CommitMessage) {
    let session = match read_last_session(&config.log_path) {
        Ok(session) => session,
        Err(e) => {
            warn!("{}; continuing with no apt actions", e);
            Session::default()
        }
    };

    let actions = filter_actions(&session.lines);
    debug!(
        "Last session has {} lines, {} actions",
        session.lines.len(),
        actions.len()
    );

    let message = CommitMessage::new(&config.message_prefix, actions);
    (session, message)
}

/// Run the full hook pipeline.
///
/// Progress and the list of changed files are written to `out`.
pub fn run_hook<V, C, W>(
    config: &HookConfig,
    vcs: &V,
    confirmer: &C,
    out: &mut W,
) -> Result<HookOutcome, HookError>
where
    V: VcsClient + ?Sized,
    C: Confirmer + ?Sized,
    W: Write + ?Sized,
{
    // ── Stage 1: Preflight checks ──
    preflight::run_checks(config, vcs)?;

    // ── Stage 2: Commit message ──
    let (_, message) = compose_message(config);

    // ── Stage 3: Working tree status ──
    let entries = vcs
        .status(&config.tracked_root)
        .map_err(HookError::Status)?;

    if entries.is_empty() {
        debug!("No changes under {}", config.tracked_root.display());
        return Ok(HookOutcome::NoChanges);
    }

    // ── Stage 4: Confirmation ──
    writeln!(
        out,
        "The following is a list of files that are changed on dpkg-tasks:"
    )
    .map_err(HookError::Output)?;
    for entry in &entries {
        writeln!(out, "{entry}").map_err(HookError::Output)?;
    }
    out.flush().map_err(HookError::Output)?;

    if !confirmer.confirm(COMMIT_QUESTION)? {
        debug!("Commit declined");
        return Ok(HookOutcome::Declined);
    }

    // ── Stage 5: Commit ──
    message
        .write_to(&config.message_file)
        .map_err(|source| HookError::MessageWrite {
            path: config.message_file.clone(),
            source,
        })?;

    vcs.commit(&config.tracked_root, &config.message_file)
        .map_err(HookError::Commit)?;

    Ok(HookOutcome::Committed)
}

/// Run preflight, compose the message and fetch status, then stop.
pub fn dry_run<V: VcsClient + ?Sized>(
    config: &HookConfig,
    vcs: &V,
) -> Result<DryRunReport, HookError> {
    preflight::run_checks(config, vcs)?;

    let (session, message) = compose_message(config);
    let status = vcs
        .status(&config.tracked_root)
        .map_err(HookError::Status)?;

    Ok(DryRunReport {
        session,
        message: message.lines().map(String::from).collect(),
        would_prompt: !status.is_empty(),
        status,
    })
}
