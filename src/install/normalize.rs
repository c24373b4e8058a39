//! Descriptor normalization: raw entry + module defaults → resolved triple.
use std::path::{Component, Path, PathBuf};

use crate::config::flavors::admits;
use crate::config::paths::expand_path;
use crate::config::{Location, SymlinkEntry};
use crate::error::InstallError;

/// A descriptor ready for path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Source name with trailing separators stripped.
    pub source_name: String,
    /// Everything before the last separator (empty for a bare leaf).
    pub middle: String,
    /// The last path component of the source name.
    pub leaf: String,
    /// Install base: the descriptor's own location, else the module's, else
    /// [`Location::PromptPerUse`].
    pub base: Location,
    /// `true` when `base` was inherited from the module.
    pub inherits_base: bool,
    /// Path inside the source tree the link will point to.
    pub target: PathBuf,
}

impl Normalized {
    /// Return `true` if the location is a per-use prompt inherited from the
    /// module (the case module-location caching applies to).
    #[must_use]
    pub fn inherits_prompt(&self) -> bool {
        self.inherits_base && self.base == Location::PromptPerUse
    }
}

/// Result of normalizing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalization {
    /// Proceed to path resolution.
    Ready(Normalized),
    /// Filtered out before any path work.
    Skipped(String),
}

/// Normalize `entry` against its module.
///
/// `module_location` is the module's current install base (possibly a cached
/// answer); `active` is the run's flavor set.
///
/// # Errors
///
/// [`InstallError::MalformedDescriptor`] for entries of the wrong shape or a
/// table without `symlink`; [`InstallError::EmptyName`] when nothing is left
/// of the name after stripping trailing separators.
pub fn normalize(
    entry: &SymlinkEntry,
    module_dir: &Path,
    module_location: Option<&Location>,
    active: &[String],
) -> Result<Normalization, InstallError> {
    let (raw_name, own_location, explicit_target) = match entry {
        SymlinkEntry::Malformed(reason) => {
            return Err(InstallError::MalformedDescriptor {
                reason: reason.clone(),
            });
        }
        SymlinkEntry::Name(name) => (name.as_str(), None, None),
        SymlinkEntry::Detailed(spec) => {
            let Some(name) = spec.symlink.as_deref() else {
                return Err(InstallError::MalformedDescriptor {
                    reason: "missing required field `symlink`".to_string(),
                });
            };
            if !spec.enabled || spec.ignore {
                return Ok(Normalization::Skipped("disabled".to_string()));
            }
            if !admits(&spec.flavors, active) {
                return Ok(Normalization::Skipped(format!(
                    "requires flavor {}",
                    spec.flavors.join(", ")
                )));
            }
            (name, spec.location.as_deref(), spec.target.as_deref())
        }
    };

    let source_name = raw_name.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    if source_name.is_empty() {
        return Err(InstallError::EmptyName);
    }
    let (middle, leaf) = source_name
        .rsplit_once(['/', std::path::MAIN_SEPARATOR])
        .unwrap_or(("", source_name));

    let (base, inherits_base) = match (own_location, module_location) {
        (Some(raw), _) => (Location::parse(raw), false),
        (None, Some(location)) => (location.clone(), true),
        (None, None) => (Location::PromptPerUse, true),
    };

    let target = explicit_target.map_or_else(
        || module_dir.join(in_tree(middle)).join(leaf),
        |raw| module_dir.join(expand_path(raw)),
    );

    Ok(Normalization::Ready(Normalized {
        source_name: source_name.to_string(),
        middle: middle.to_string(),
        leaf: leaf.to_string(),
        base,
        inherits_base,
        target,
    }))
}

/// The middle segments as they appear inside the module directory: a
/// leading root, drive prefix or `~` names an install location, not a
/// source-tree directory, so it is dropped.
fn in_tree(middle: &str) -> PathBuf {
    Path::new(middle)
        .components()
        .enumerate()
        .filter(|(i, c)| match c {
            Component::Prefix(_) | Component::RootDir => false,
            Component::Normal(part) => *i != 0 || part.to_str() != Some("~"),
            Component::CurDir | Component::ParentDir => true,
        })
        .map(|(_, c)| c)
        .collect()
}
