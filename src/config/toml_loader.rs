//! Module config file lookup and TOML parsing.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Machine-local config filename; takes precedence over the shared one.
pub const LOCAL_CONFIG_FILE: &str = "dotlink.local.toml";

/// Shared (committed) config filename.
pub const SHARED_CONFIG_FILE: &str = "dotlink.toml";

/// Both recognised config filenames, in precedence order.
pub const CONFIG_FILES: [&str; 2] = [LOCAL_CONFIG_FILE, SHARED_CONFIG_FILE];

/// Raw contents of a module config file.
///
/// Unknown keys are ignored. `symlinks` is kept as raw values so that one
/// malformed entry does not invalidate the whole file.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleFile {
    /// Module install base (`"?"` prompts per use).
    #[serde(default)]
    pub location: Option<String>,
    /// `false` switches the module off.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// `true` switches the module off.
    #[serde(default)]
    pub ignore: bool,
    /// Required flavors; empty = unconditional.
    #[serde(default)]
    pub flavors: Vec<String>,
    /// Add every file in the module directory to the symlink list.
    #[serde(default)]
    pub infer_symlinks: bool,
    /// Explicit descriptor list; absence implies inference.
    #[serde(default)]
    pub symlinks: Option<Vec<toml::Value>>,
}

impl ModuleFile {
    /// The file used for a top-level directory that has no config:
    /// prompt for the location and infer every entry.
    #[must_use]
    pub fn implicit() -> Self {
        Self {
            location: Some("?".to_string()),
            infer_symlinks: true,
            ..Self::default()
        }
    }
}

/// Return the config file governing `dir`, honouring local-over-shared
/// precedence.
#[must_use]
pub fn config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read and parse a module config file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML of the expected shape.
pub fn load_module_file(path: &Path) -> Result<ModuleFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}
