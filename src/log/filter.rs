//! Narrowing log lines down to package state changes.

/// Substrings dpkg prints for the package actions worth recording.
pub const ACTION_MARKERS: [&str; 4] = ["Removing", "Setting up", "Purging", "Configuring"];

/// Whether `line` reports one of the recorded package actions.
pub fn is_action_line(line: &str) -> bool {
    ACTION_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Keep only action lines, with carriage returns removed.
///
/// dpkg progress output embeds `\r` to redraw the terminal; those bytes are
/// stripped so the commit message reads as plain lines. Nothing else about
/// a kept line changes.
pub fn filter_actions<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| is_action_line(line))
        .map(|line| line.replace('\r', ""))
        .collect()
}
