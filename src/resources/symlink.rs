//! Symlink resource: current state of one install path.
use std::path::{Path, PathBuf};

use super::ResourceState;
use super::helpers::fs::{is_real_dir, is_symlink, lexists};

/// A symlink at `install` that should resolve to `target`.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The file or directory inside the source tree the link points to.
    pub target: PathBuf,
    /// Where the link lives on the local machine.
    pub install: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(target: PathBuf, install: PathBuf) -> Self {
        Self { target, install }
    }

    /// Human-readable `install -> target` description.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.install.display(), self.target.display())
    }

    /// Check the current state of the install path.
    ///
    /// - [`ResourceState::Invalid`]: the target does not exist.
    /// - [`ResourceState::Missing`]: nothing lives at the install path.
    /// - [`ResourceState::Correct`]: the install path is a symlink whose
    ///   resolved real path is the target's real path.
    /// - [`ResourceState::Incorrect`]: anything else.
    #[must_use]
    pub fn current_state(&self) -> ResourceState {
        if !self.target.exists() {
            return ResourceState::Invalid {
                reason: format!("target does not exist: {}", self.target.display()),
            };
        }

        if !lexists(&self.install) {
            return ResourceState::Missing;
        }

        if is_symlink(&self.install) {
            if same_real_path(&self.install, &self.target) {
                return ResourceState::Correct;
            }
            let current = std::fs::read_link(&self.install).map_or_else(
                |_| "unreadable symlink".to_string(),
                |dest| format!("points to {}", dest.display()),
            );
            return ResourceState::Incorrect { current };
        }

        let current = if is_real_dir(&self.install) {
            "a directory"
        } else {
            "a regular file"
        };
        ResourceState::Incorrect {
            current: current.to_string(),
        }
    }
}

/// Compare the fully resolved real paths of `a` and `b`.
fn same_real_path(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
