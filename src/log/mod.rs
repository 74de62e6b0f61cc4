//! Apt transaction log parsing.
//!
//! `term.log` accumulates one delimited session per apt invocation. The hook
//! only ever cares about the newest closed session and the package actions
//! it contains.

pub mod filter;
pub mod session;

pub use filter::{ACTION_MARKERS, filter_actions, is_action_line};
pub use session::{END_MARKER, START_MARKER, Session, extract_last_session, read_last_session};
