//! Module records and their symlink descriptors.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::Location;

/// One managed file or directory entry within a module.
///
/// Config files may list an entry either as a bare name or as a table; both
/// forms normalize identically. Entries whose shape cannot be understood are
/// kept as [`SymlinkEntry::Malformed`] so that the failure is reported for
/// that descriptor alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymlinkEntry {
    /// Shorthand: `"vimrc"` or `"config/nvim/"`.
    Name(String),
    /// Structured: `{ symlink = "vimrc", location = "~", ... }`.
    Detailed(SymlinkSpec),
    /// An entry that is neither a string nor a well-formed table.
    Malformed(String),
}

/// The structured form of a symlink descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SymlinkSpec {
    /// Source name relative to the module directory. Required.
    #[serde(default)]
    pub symlink: Option<String>,
    /// Install base overriding the module's (`"?"` prompts per use).
    #[serde(default)]
    pub location: Option<String>,
    /// Explicit source-tree target overriding `<module>/<symlink>`.
    #[serde(default)]
    pub target: Option<String>,
    /// Set to `false` to switch the descriptor off.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Set to `true` to switch the descriptor off.
    #[serde(default)]
    pub ignore: bool,
    /// Flavors of which at least one must be active; empty = unconditional.
    #[serde(default)]
    pub flavors: Vec<String>,
}

const fn default_true() -> bool {
    true
}

impl SymlinkSpec {
    /// Create a structured descriptor for `name` with every option unset.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            symlink: Some(name.into()),
            location: None,
            target: None,
            enabled: true,
            ignore: false,
            flavors: Vec::new(),
        }
    }
}

impl SymlinkEntry {
    /// Convert one raw `symlinks` array element into an entry.
    #[must_use]
    pub fn from_value(value: toml::Value) -> Self {
        match value {
            toml::Value::String(name) => Self::Name(name),
            toml::Value::Table(table) => match toml::Value::Table(table).try_into() {
                Ok(spec) => Self::Detailed(spec),
                Err(e) => Self::Malformed(e.message().to_string()),
            },
            other => Self::Malformed(format!(
                "expected a string or a table, found {}",
                other.type_str()
            )),
        }
    }

    /// Return the descriptor's source name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Detailed(spec) => spec.symlink.as_deref(),
            Self::Malformed(_) => None,
        }
    }
}

impl From<&str> for SymlinkEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// One configuration unit: a directory in the source tree plus the
/// descriptors it manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Name relative to the source root, `/`-separated.
    pub name: String,
    /// Absolute path of the module's directory.
    pub source_path: PathBuf,
    /// Install base for descriptors without their own location.
    pub location: Option<Location>,
    /// `false` when the config switches the module off.
    pub enabled: bool,
    /// Flavors of which at least one must be active; empty = unconditional.
    pub flavors: Vec<String>,
    /// Effective descriptor list (explicit entries, then inferred ones).
    pub symlinks: Vec<SymlinkEntry>,
}

impl ModuleRecord {
    /// Create an enabled, unconditional module with no location or entries.
    #[must_use]
    pub fn new(name: impl Into<String>, source_path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.as_ref().to_path_buf(),
            location: None,
            enabled: true,
            flavors: Vec::new(),
            symlinks: Vec::new(),
        }
    }

    /// Set the module-level install base.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the module's required flavors.
    #[must_use]
    pub fn with_flavors<S: Into<String>>(mut self, flavors: impl IntoIterator<Item = S>) -> Self {
        self.flavors = flavors.into_iter().map(Into::into).collect();
        self
    }

    /// Append a descriptor.
    #[must_use]
    pub fn with_symlink(mut self, entry: impl Into<SymlinkEntry>) -> Self {
        self.symlinks.push(entry.into());
        self
    }
}

impl From<SymlinkSpec> for SymlinkEntry {
    fn from(spec: SymlinkSpec) -> Self {
        Self::Detailed(spec)
    }
}
