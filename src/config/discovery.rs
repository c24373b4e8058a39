//! Module discovery: walk the source tree and build module records.
use std::path::{Component, Path};

use walkdir::{DirEntry, WalkDir};

use super::infer;
use super::module::{ModuleRecord, SymlinkEntry};
use super::toml_loader::{self, ModuleFile};
use super::{Location, RunConfig};
use crate::error::ConfigError;

/// A module found in the source tree.
#[derive(Debug)]
pub enum Discovered {
    /// A module whose configuration loaded.
    Module(ModuleRecord),
    /// A module whose config file could not be loaded.
    Invalid {
        /// Module name relative to the source root.
        name: String,
        /// Why loading failed.
        error: ConfigError,
    },
}

impl Discovered {
    /// Return the module name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Module(record) => &record.name,
            Self::Invalid { name, .. } => name,
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn module_name(root: &Path, dir: &Path) -> String {
    dir.strip_prefix(root)
        .unwrap_or(dir)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `root` and return every selected module in file-name order.
///
/// A directory holding a config file is a module. A top-level directory
/// without one is an implicit module that prompts for its location and
/// infers its entries. Hidden directories are never walked. The allow-list
/// and exclude-list in `config` are applied by module name before any config
/// file is read.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRoot`] if `root` is not a directory and
/// [`ConfigError::Io`] if the tree cannot be enumerated.
pub fn discover(root: &Path, config: &RunConfig) -> Result<Vec<Discovered>, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::MissingRoot(root.to_path_buf()));
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| ConfigError::Io {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        let name = module_name(root, dir);
        if !config.selects_module(&name) {
            continue;
        }

        let file = match toml_loader::config_file_in(dir) {
            Some(path) => toml_loader::load_module_file(&path),
            None if entry.depth() == 1 => Ok(ModuleFile::implicit()),
            None => continue,
        };

        found.push(
            match file.and_then(|file| build_record(name.clone(), dir, file)) {
                Ok(record) => Discovered::Module(record),
                Err(error) => Discovered::Invalid { name, error },
            },
        );
    }
    Ok(found)
}

/// Turn a parsed config file into a [`ModuleRecord`], running inference
/// when the file asks for it or lists no symlinks at all.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if inference cannot list the module directory.
pub fn build_record(
    name: String,
    dir: &Path,
    file: ModuleFile,
) -> Result<ModuleRecord, ConfigError> {
    let infer = file.infer_symlinks || file.symlinks.is_none();
    let explicit: Vec<SymlinkEntry> = file
        .symlinks
        .unwrap_or_default()
        .into_iter()
        .map(SymlinkEntry::from_value)
        .collect();

    let symlinks = if infer {
        let inferred = infer::infer_entries(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        infer::merge(explicit, inferred)
    } else {
        explicit
    };

    let mut record = ModuleRecord::new(name, dir);
    record.location = file.location.as_deref().map(Location::parse);
    record.enabled = file.enabled.unwrap_or(true) && !file.ignore;
    record.flavors = file.flavors;
    record.symlinks = symlinks;
    Ok(record)
}
