//! Filesystem mutation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the swap sequence can be
//! unit-tested against injected failures.  Production code uses
//! [`SystemFileSystemOps`]; tests use `FaultyFileSystemOps`.

use std::io;
use std::path::Path;

/// Abstraction over the filesystem mutations performed while installing a
/// symlink.
///
/// Queries (existence, metadata, canonicalisation) go straight to
/// [`std::fs`]; only the calls that change the filesystem are routed through
/// this trait, which keeps dry-run and failure handling in one place.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Create a symbolic link at `link` pointing to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Rename `from` to `to`, replacing `to` if it is a non-directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create a hard link at `link` to the entry at `original`, without
    /// following a symlink at `original`.
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem refuses the link.
    fn hard_link(&self, original: &Path, link: &Path) -> io::Result<()>;

    /// Remove the file or symlink at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove the directory at `path` and everything under it.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn hard_link(&self, original: &Path, link: &Path) -> io::Result<()> {
        std::fs::hard_link(original, link)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        // Directory symlinks on Windows are removed as directories.
        #[cfg(windows)]
        if std::fs::symlink_metadata(path).is_ok_and(|m| m.is_symlink())
            && std::fs::metadata(path).is_ok_and(|m| m.is_dir())
        {
            return std::fs::remove_dir(path);
        }
        std::fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// Which [`FileSystemOps`] call a [`FaultyFileSystemOps`] should fail.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    /// [`FileSystemOps::symlink`]
    Symlink,
    /// [`FileSystemOps::rename`]
    Rename,
    /// [`FileSystemOps::hard_link`]
    HardLink,
    /// [`FileSystemOps::remove_file`]
    RemoveFile,
    /// [`FileSystemOps::remove_dir_all`]
    RemoveDirAll,
}

/// Test [`FileSystemOps`] that performs real operations except for the
/// configured ones, which fail with `PermissionDenied`.
///
/// Every call is recorded so tests can assert on the sequence.
///
/// # Example
///
/// ```ignore
/// let ops = FaultyFileSystemOps::new().failing(FsOp::Rename);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FaultyFileSystemOps {
    failing: Vec<FsOp>,
    fail_nth: std::collections::HashMap<FsOp, usize>,
    calls: std::sync::Mutex<Vec<FsOp>>,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl FaultyFileSystemOps {
    /// Create a mock that fails nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call of `op`.
    #[must_use]
    pub fn failing(mut self, op: FsOp) -> Self {
        self.failing.push(op);
        self
    }

    /// Fail only the `nth` call (0-based) of `op`.
    #[must_use]
    pub fn failing_call(mut self, op: FsOp, nth: usize) -> Self {
        self.fail_nth.insert(op, nth);
        self
    }

    /// Return the operations called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<FsOp> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn check(&self, op: FsOp) -> io::Result<()> {
        let mut calls = self.calls.lock().expect("mock call log poisoned");
        let prior = calls.iter().filter(|c| **c == op).count();
        calls.push(op);
        let fails = self.failing.contains(&op)
            || self.fail_nth.get(&op) == Some(&prior);
        if fails {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected {op:?} failure"),
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
impl FileSystemOps for FaultyFileSystemOps {
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        self.check(FsOp::Symlink)?;
        SystemFileSystemOps.symlink(target, link)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.check(FsOp::Rename)?;
        SystemFileSystemOps.rename(from, to)
    }

    fn hard_link(&self, original: &Path, link: &Path) -> io::Result<()> {
        self.check(FsOp::HardLink)?;
        SystemFileSystemOps.hard_link(original, link)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check(FsOp::RemoveFile)?;
        SystemFileSystemOps.remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(FsOp::RemoveDirAll)?;
        SystemFileSystemOps.remove_dir_all(path)
    }
}
