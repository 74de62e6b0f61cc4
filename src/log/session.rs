//! Extraction of the most recent closed session from the apt transaction log.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex_lite::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::LogError;

/// Substring marking the first line of a session.
pub const START_MARKER: &str = "Log started:";

/// Substring marking the last line of a session.
pub const END_MARKER: &str = "Log ended:";

/// Matches the timestamp apt writes after a delimiter, e.g.
/// `Log started: 2024-01-01  10:00:00`. The time part is optional.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Log (?:started|ended):\s*(\d{4}-\d{2}-\d{2})(?:\s+(\d{2}:\d{2}:\d{2}))?")
        .expect("Invalid regex")
});

/// Lines of one apt session, delimiters excluded, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub lines: Vec<String>,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Read the transaction log at `path` and extract its last closed session.
///
/// Invalid UTF-8 is decoded lossily; apt writes raw dpkg output into the
/// log and the occasional stray byte must not hide the whole session.
pub fn read_last_session(path: &Path) -> Result<Session, LogError> {
    let bytes = std::fs::read(path).map_err(|source| LogError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8_lossy(&bytes);
    Ok(extract_last_session(&content))
}

/// Extract the most recent closed session from the full log text.
///
/// Returns an empty session when the log is empty or its final line is not
/// an end marker (apt is still writing, or the file was truncated).
/// Otherwise walks backward from the line before the end marker until a
/// start marker or the beginning of the file.
pub fn extract_last_session(content: &str) -> Session {
    let lines: Vec<&str> = content.lines().collect();

    let Some(last) = lines.last() else {
        debug!("Transaction log is empty");
        return Session::default();
    };

    if !last.contains(END_MARKER) {
        debug!("Last log line is not an end marker; session still open or log truncated");
        return Session::default();
    }

    let end = lines.len() - 1;
    let mut start = end;
    let mut started_at = None;

    while start > 0 {
        let line = lines[start - 1];
        if line.contains(START_MARKER) {
            started_at = parse_marker_timestamp(line);
            break;
        }
        start -= 1;
    }

    if start == 0 {
        debug!("Reached start of log without a start marker");
    }

    Session {
        lines: lines[start..end].iter().map(|l| l.to_string()).collect(),
        started_at,
        ended_at: parse_marker_timestamp(last),
    }
}

/// Parse the timestamp following a delimiter, if one is present and valid.
fn parse_marker_timestamp(line: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_RE.captures(line)?;
    let date = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()?;
    let time = match caps.get(2) {
        Some(t) => NaiveTime::parse_from_str(t.as_str(), "%H:%M:%S").ok()?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    Some(date.and_time(time))
}
