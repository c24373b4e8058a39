//! Safety guard: install paths must never alias the managed source tree.
use std::path::{Path, PathBuf};

use super::helpers::fs::is_symlink;
use crate::error::InstallError;

/// Reject `install` if it resolves to the source tree root or anything
/// beneath it.
///
/// Existing symbolic links along the path are resolved before the check.
/// The one exemption is an `install` that is itself a symbolic link: that is
/// how a link created by an earlier run looks, and re-detecting it must not
/// trip the guard.
///
/// # Errors
///
/// Returns [`InstallError::PathInsideSourceTree`] when the guard trips.
pub fn ensure_outside_source(install: &Path, source_root: &Path) -> Result<(), InstallError> {
    if is_symlink(install) {
        return Ok(());
    }
    let real_root = dunce::canonicalize(source_root).unwrap_or_else(|_| source_root.to_path_buf());
    let real_install = resolve_existing(install);
    if real_install.starts_with(&real_root) {
        return Err(InstallError::PathInsideSourceTree {
            path: install.to_path_buf(),
            root: source_root.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// components that do not exist yet.
fn resolve_existing(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        if let Ok(real) = dunce::canonicalize(existing) {
            return missing.iter().rev().fold(real, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
