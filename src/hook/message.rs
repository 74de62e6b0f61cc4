//! Commit message built from the last apt session.

use std::fmt;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Suffix of the first message line, after the configured prefix.
pub const HEADER_SUFFIX: &str = "last-apt-action:";

/// A fixed header line followed by the session's action lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    header: String,
    actions: Vec<String>,
}

impl CommitMessage {
    pub fn new(prefix: &str, actions: Vec<String>) -> Self {
        Self {
            header: format!("{prefix}{HEADER_SUFFIX}"),
            actions,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Header first, then every action line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.header.as_str()).chain(self.actions.iter().map(String::as_str))
    }

    /// Write the message to `path`, replacing whatever was there.
    ///
    /// The text goes to a temporary file in the same directory which is
    /// then renamed over `path`, so a reader never sees a partial message.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(self.to_string().as_bytes())?;
        file.flush()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
