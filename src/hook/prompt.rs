//! Operator confirmation before committing.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;
use dialoguer::console::Term;

use crate::error::HookError;

/// Question asked once the changed files have been listed.
pub const COMMIT_QUESTION: &str = "Do you want to commit these files? (y/N)";

/// Asks the operator a yes/no question.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer {
    /// Block until the operator answers; `true` only for an accepting answer.
    fn confirm(&self, question: &str) -> Result<bool, HookError>;
}

/// Only a case-insensitive `y` accepts. Anything else, including an empty
/// answer, declines.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']).eq_ignore_ascii_case("y")
}

/// Read one answer line from `reader`. End of input reads as empty.
pub fn read_answer<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(answer)
}

/// Write `question` to `out`, then read one answer line from `reader`.
pub fn ask_line<R, W>(question: &str, reader: &mut R, out: &mut W) -> Result<bool, HookError>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{question} ").map_err(HookError::Output)?;
    out.flush().map_err(HookError::Output)?;
    let answer = read_answer(reader).map_err(HookError::ReadAnswer)?;
    Ok(is_affirmative(&answer))
}

/// Prompts on the controlling terminal, or reads a line from piped stdin.
///
/// Both paths print the question on stdout.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, question: &str) -> Result<bool, HookError> {
        if io::stdin().is_terminal() {
            let answer = Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text_on(&Term::stdout())
                .map_err(HookError::Prompt)?;
            Ok(is_affirmative(&answer))
        } else {
            ask_line(question, &mut io::stdin().lock(), &mut io::stdout())
        }
    }
}

/// Accepts without asking, for unattended runs.
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _question: &str) -> Result<bool, HookError> {
        Ok(true)
    }
}

/// The confirmer for a run: [`AssumeYes`] with `--yes`, otherwise the terminal.
pub fn select_confirmer(assume_yes: bool) -> Box<dyn Confirmer> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmer)
    }
}
