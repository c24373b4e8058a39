//! Run configuration, module records, and module discovery.
pub mod discovery;
pub mod flavors;
pub mod infer;
pub mod module;
pub mod paths;
pub mod toml_loader;

use std::fmt;
use std::path::PathBuf;

pub use module::{ModuleRecord, SymlinkEntry, SymlinkSpec};

/// Where a module's or descriptor's files are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Install under this base directory.
    Fixed(PathBuf),
    /// Ask the prompt collaborator each time a path is needed.
    PromptPerUse,
}

impl Location {
    /// The config-file spelling of [`Location::PromptPerUse`].
    pub const ASK: &'static str = "?";

    /// Parse a config-file location string, expanding `~` and variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotlink_cli::config::Location;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(Location::parse("?"), Location::PromptPerUse);
    /// assert_eq!(Location::parse("/etc"), Location::Fixed(PathBuf::from("/etc")));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == Self::ASK {
            Self::PromptPerUse
        } else {
            Self::Fixed(paths::expand_path(raw))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(path) => write!(f, "{}", path.display()),
            Self::PromptPerUse => f.write_str(Self::ASK),
        }
    }
}

/// Options that shape a single run, built once from the command line and
/// passed by reference to every component that makes a decision.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunConfig {
    /// Decide everything but mutate nothing.
    pub dry_run: bool,
    /// Never block on a prompt; prompts answer "no answer" (confirmations "yes").
    pub non_interactive: bool,
    /// Active flavors.
    pub flavors: Vec<String>,
    /// If non-empty, only these modules run.
    pub modules: Vec<String>,
    /// Modules that never run.
    pub exclude_modules: Vec<String>,
    /// Ask once per module for a base path when the module prompts per use.
    pub cache_module_location: bool,
    /// Run modules concurrently (only honoured when non-interactive).
    pub parallel: bool,
}

impl RunConfig {
    /// Return `true` if the allow-list and exclude-list select module `name`.
    #[must_use]
    pub fn selects_module(&self, name: &str) -> bool {
        let allowed = self.modules.is_empty() || self.modules.iter().any(|m| m == name);
        allowed && !self.exclude_modules.iter().any(|m| m == name)
    }

    /// Return `true` if modules should run on the worker pool.
    #[must_use]
    pub const fn runs_parallel(&self) -> bool {
        self.parallel && self.non_interactive
    }
}
