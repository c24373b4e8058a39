//! Interactive prompting for install locations and confirmations.
//!
//! The installer never reads the terminal itself: every question goes through
//! a [`Prompter`], so non-interactive runs and tests substitute a collaborator
//! that answers without blocking.
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::paths::expand_path;
use crate::resources::helpers::fs::lexists;

/// Answer to a path question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    /// Use this path.
    Path(PathBuf),
    /// The user chose to skip (empty answer).
    Skip,
    /// Nobody can answer (non-interactive run, closed input).
    Unavailable,
}

/// Source of answers for location and confirmation questions.
pub trait Prompter: Send + Sync + fmt::Debug {
    /// Ask where the entry named `leaf` should be installed. `reason`
    /// explains why an earlier path was rejected.
    fn install_path(&self, leaf: &str, reason: Option<&str>) -> PromptAnswer;

    /// Ask for a base directory shared by every entry of `module`.
    fn module_base_path(&self, module: &str) -> PromptAnswer;

    /// Ask a yes/no question; `true` means yes.
    fn confirm(&self, question: &str) -> bool;
}

/// Prompter for unattended runs: never has a path, always agrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl Prompter for NonInteractive {
    fn install_path(&self, _leaf: &str, _reason: Option<&str>) -> PromptAnswer {
        PromptAnswer::Unavailable
    }

    fn module_base_path(&self, _module: &str) -> PromptAnswer {
        PromptAnswer::Unavailable
    }

    fn confirm(&self, _question: &str) -> bool {
        true
    }
}

/// Line-oriented prompter over a reader and a writer (stdin/stdout by
/// default).
pub struct TerminalPrompter {
    io: Mutex<Streams>,
}

struct Streams {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl fmt::Debug for TerminalPrompter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalPrompter")
            .field("io", &"<dyn BufRead + dyn Write>")
            .finish()
    }
}

impl TerminalPrompter {
    /// Prompt on the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::with_io(io::BufReader::new(io::stdin()), io::stdout())
    }

    /// Prompt on arbitrary streams.
    #[must_use]
    pub fn with_io(
        input: impl BufRead + Send + 'static,
        output: impl Write + Send + 'static,
    ) -> Self {
        Self {
            io: Mutex::new(Streams {
                input: Box::new(input),
                output: Box::new(output),
            }),
        }
    }

    /// Write `text` (no newline) and read one trimmed line back.
    /// `None` means end of input or an unreadable stream.
    fn ask(&self, text: &str) -> Option<String> {
        let mut streams = self
            .io
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        write!(streams.output, "{text}").ok()?;
        streams.output.flush().ok()?;
        let mut line = String::new();
        match streams.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn say(&self, text: &str) {
        let mut streams = self
            .io
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = writeln!(streams.output, "{text}");
    }

    /// Confirm replacing whatever already lives at `path`.
    fn confirm_replace(&self, path: &Path) -> bool {
        self.confirm(&format!("Replace {} ?", path.display()))
    }
}

/// Parse a yes/no answer; an empty answer means yes.
fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "" | "y" | "ye" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl Prompter for TerminalPrompter {
    fn install_path(&self, leaf: &str, reason: Option<&str>) -> PromptAnswer {
        if let Some(reason) = reason {
            self.say(&format!(" ! {reason}"));
        }
        loop {
            let Some(answer) = self.ask(&format!(
                " - Provide a path for the local {leaf} on this computer. \
                 Leave empty to skip this file.\n   > "
            )) else {
                return PromptAnswer::Unavailable;
            };
            if answer.is_empty() {
                return PromptAnswer::Skip;
            }
            let path = expand_path(&answer);

            // A directory holding the leaf: offer the leaf inside it first.
            let inner = path.join(leaf);
            if path.is_dir() && lexists(&inner) && self.confirm_replace(&inner) {
                return PromptAnswer::Path(inner);
            }
            if lexists(&path) {
                if self.confirm_replace(&path) {
                    return PromptAnswer::Path(path);
                }
                continue;
            }
            if path.parent().is_some_and(Path::is_dir) {
                if self.confirm(&format!("Create {} ?", path.display())) {
                    return PromptAnswer::Path(path);
                }
                continue;
            }
            self.say("Invalid path. Please try again.");
        }
    }

    fn module_base_path(&self, module: &str) -> PromptAnswer {
        loop {
            let Some(answer) = self.ask(&format!(
                " - Provide the base path for all the files in module {module}. \
                 Leave empty to enter the location of each file individually.\n   > "
            )) else {
                return PromptAnswer::Unavailable;
            };
            if answer.is_empty() {
                return PromptAnswer::Skip;
            }
            let path = expand_path(&answer);
            if path.is_dir() {
                return PromptAnswer::Path(path);
            }
            self.say("Invalid path. Please try again.");
        }
    }

    fn confirm(&self, question: &str) -> bool {
        loop {
            let Some(answer) = self.ask(&format!("{question} [Y/n] ")) else {
                return false;
            };
            if let Some(yes) = parse_yes_no(&answer) {
                return yes;
            }
            self.say("Please respond with 'yes' or 'no' (or 'y' or 'n').");
        }
    }
}

/// Prompter that replays canned answers and records every question.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    paths: Mutex<std::collections::VecDeque<PromptAnswer>>,
    bases: Mutex<std::collections::VecDeque<PromptAnswer>>,
    confirms: Mutex<std::collections::VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::must_use_candidate, clippy::return_self_not_must_use)]
impl ScriptedPrompter {
    /// An empty script: paths skip, confirms say yes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for [`Prompter::install_path`].
    pub fn path(self, answer: PromptAnswer) -> Self {
        self.paths.lock().unwrap().push_back(answer);
        self
    }

    /// Queue an answer for [`Prompter::module_base_path`].
    pub fn base(self, answer: PromptAnswer) -> Self {
        self.bases.lock().unwrap().push_back(answer);
        self
    }

    /// Queue an answer for [`Prompter::confirm`]; unqueued confirms are yes.
    pub fn confirm_with(self, yes: bool) -> Self {
        self.confirms.lock().unwrap().push_back(yes);
        self
    }

    /// Every question asked so far, tagged by kind.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl Prompter for ScriptedPrompter {
    fn install_path(&self, leaf: &str, reason: Option<&str>) -> PromptAnswer {
        self.asked
            .lock()
            .unwrap()
            .push(format!("path {leaf} {}", reason.unwrap_or("-")));
        self.paths
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PromptAnswer::Skip)
    }

    fn module_base_path(&self, module: &str) -> PromptAnswer {
        self.asked.lock().unwrap().push(format!("base {module}"));
        self.bases
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PromptAnswer::Skip)
    }

    fn confirm(&self, question: &str) -> bool {
        self.asked.lock().unwrap().push(format!("confirm {question}"));
        self.confirms.lock().unwrap().pop_front().unwrap_or(true)
    }
}
