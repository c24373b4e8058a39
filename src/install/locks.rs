//! Per-install-path mutual exclusion.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Registry of one lock per install path.
///
/// Two descriptors that resolve to the same install path (possibly from
/// different modules running in parallel) must not interleave their
/// inspect-backup-swap sequences; the second one sees the first one's link.
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `path`.
    ///
    /// Paths are keyed by their canonical parent joined with the leaf, so an
    /// install path reached through a symlinked directory shares the lock of
    /// the real one. The leaf itself is not resolved: it is the link being
    /// replaced.
    pub fn with_lock<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let key = lock_key(path);
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key).or_default())
        };
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Number of distinct paths locked so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Return `true` if no path has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical parent plus leaf; the absolute, lexically normalized path when
/// the parent cannot be resolved.
fn lock_key(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let lexical: PathBuf = absolute.components().collect();
    match (lexical.parent(), lexical.file_name()) {
        (Some(parent), Some(leaf)) => dunce::canonicalize(parent)
            .map_or_else(|_| lexical.clone(), |real| real.join(leaf)),
        _ => lexical,
    }
}
