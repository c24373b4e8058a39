//! Numbered backup chain for an install path.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::compare::deep_equal;
use super::helpers::fs::lexists;

/// The backups that exist beside an install path.
///
/// Backups are named `<install>.bak<N>` with `N` dense from 1: every write
/// uses the first free slot, so the scan stops at the first gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupChain {
    /// The highest-numbered existing backup, if any.
    pub most_recent: Option<PathBuf>,
    /// The first unused backup path.
    pub next: PathBuf,
}

/// What to do with the live entry at an install path before linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupDecision {
    /// Preserve the live entry at this (previously unused) path.
    Write(PathBuf),
    /// The most recent backup already holds identical content.
    Dedup(PathBuf),
}

/// Return `<install>.bak<n>`.
#[must_use]
pub fn backup_path(install: &Path, n: u32) -> PathBuf {
    let mut name = OsString::from(install.as_os_str());
    name.push(format!(".bak{n}"));
    PathBuf::from(name)
}

impl BackupChain {
    /// Scan `.bak1`, `.bak2`, … beside `install` until the first unused slot.
    #[must_use]
    pub fn scan(install: &Path) -> Self {
        let mut n = 1;
        while lexists(&backup_path(install, n)) {
            n += 1;
        }
        Self {
            most_recent: (n > 1).then(|| backup_path(install, n - 1)),
            next: backup_path(install, n),
        }
    }

    /// Decide whether the live entry at `install` needs a new backup.
    ///
    /// A new backup is skipped only when the most recent backup is deeply
    /// equal to both `target` and the live entry, so nothing that is not
    /// already preserved can be lost. Comparison errors count as "different".
    #[must_use]
    pub fn decide(&self, install: &Path, target: &Path) -> BackupDecision {
        if let Some(recent) = &self.most_recent
            && deep_equal(target, recent).unwrap_or(false)
            && deep_equal(install, recent).unwrap_or(false)
        {
            return BackupDecision::Dedup(recent.clone());
        }
        BackupDecision::Write(self.next.clone())
    }
}
