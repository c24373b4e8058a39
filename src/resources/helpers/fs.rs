//! File-system resource helpers: existence probes and the atomic link swap.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::operations::FileSystemOps;

/// Suffix marking temporary links created during a swap.
pub const TMP_SUFFIX: &str = ".dotlink-tmp";

// Unique temporary names within a process.
static NEXT_TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Return `true` if anything exists at `path`, including a dangling symlink.
#[must_use]
pub fn lexists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Return `true` if `path` is a symbolic link (dangling or not).
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_symlink())
}

/// Return `true` if `path` is a real directory, not a link to one.
#[must_use]
pub fn is_real_dir(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.is_dir())
}

/// Return a fresh hidden sibling name for `path`:
/// `.<name>.<pid>.<counter>.dotlink-tmp`.
#[must_use]
pub fn temp_sibling(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let fname = path
        .file_name()
        .map_or_else(|| "target".into(), |n| n.to_string_lossy());
    let pid = std::process::id();
    let ctr = NEXT_TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    parent.join(format!(".{fname}.{pid}.{ctr}{TMP_SUFFIX}"))
}

/// Fsync the parent directory of `path` for durability (best effort).
pub fn fsync_parent_dir(path: &Path) {
    #[cfg(unix)]
    if let Some(parent) = path.parent()
        && let Ok(dir) = std::fs::File::open(parent)
    {
        let _ = dir.sync_all();
    }
    #[cfg(not(unix))]
    let _ = path;
}

/// How the live entry at the install path is treated during a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preserve<'a> {
    /// Nothing lives at the install path.
    Nothing,
    /// Preserve the live entry at this backup path.
    BackupTo(&'a Path),
    /// The live entry is already preserved elsewhere and may be replaced.
    Replace,
}

/// A failed swap step: the path it touched and the underlying error.
pub type SwapError = (PathBuf, std::io::Error);

/// Replace whatever lives at `install` with a symlink to `target`.
///
/// The new link is built under a temporary sibling name first and renamed
/// over `install` in one step, so `install` never goes missing for
/// non-directory entries:
///
/// 1. create the temporary link;
/// 2. preserve the live entry: hard-link a non-directory to the backup path
///    (falling back to a rename only where hard links are unsupported), or
///    rename a directory there; for [`Preserve::Replace`] a real directory
///    is moved aside to a second temporary sibling;
/// 3. rename the temporary link over `install`, then fsync the parent and
///    delete any directory moved aside in step 2.
///
/// A failure in step 2 or 3 removes the temporary link and undoes the
/// backup step, leaving `install` as it was.
///
/// # Errors
///
/// Returns the path and error of the first failing step.
pub fn swap_in_symlink(
    ops: &dyn FileSystemOps,
    target: &Path,
    install: &Path,
    preserve: Preserve<'_>,
) -> Result<(), SwapError> {
    let tmp = temp_sibling(install);
    ops.symlink(target, &tmp).map_err(|e| (tmp.clone(), e))?;

    let cleanup = |ops: &dyn FileSystemOps| {
        let _ = ops.remove_file(&tmp);
    };

    let dir = is_real_dir(install);
    let step = match preserve {
        Preserve::Replace if dir => {
            let aside = temp_sibling(install);
            ops.rename(install, &aside)
                .map(|()| Some(Undo::RestoreAside(aside)))
        }
        Preserve::Nothing | Preserve::Replace => Ok(None),
        Preserve::BackupTo(backup) if dir => ops
            .rename(install, backup)
            .map(|()| Some(Undo::RenameBack(backup.to_path_buf()))),
        Preserve::BackupTo(backup) => match ops.hard_link(install, backup) {
            Ok(()) => Ok(Some(Undo::RemoveLink(backup.to_path_buf()))),
            Err(e) if hard_links_unsupported(&e) => ops
                .rename(install, backup)
                .map(|()| Some(Undo::RenameBack(backup.to_path_buf()))),
            Err(e) => Err(e),
        },
    };
    let undo = match step {
        Ok(undo) => undo,
        Err(e) => {
            cleanup(ops);
            return Err((install.to_path_buf(), e));
        }
    };

    if let Err(e) = ops.rename(&tmp, install) {
        cleanup(ops);
        match undo {
            Some(Undo::RemoveLink(backup)) => {
                let _ = ops.remove_file(&backup);
            }
            Some(Undo::RenameBack(moved) | Undo::RestoreAside(moved)) => {
                let _ = ops.rename(&moved, install);
            }
            None => {}
        }
        return Err((install.to_path_buf(), e));
    }

    fsync_parent_dir(install);
    if let Some(Undo::RestoreAside(aside)) = undo {
        // The link is in place; a leftover hidden directory is only clutter.
        let _ = ops.remove_dir_all(&aside);
    }
    Ok(())
}

/// Errors after which renaming to the backup path is an acceptable substitute
/// for a hard link. `AlreadyExists` is not one: a rename would clobber it.
fn hard_links_unsupported(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::PermissionDenied
            | std::io::ErrorKind::Unsupported
            | std::io::ErrorKind::CrossesDevices
    )
}

/// How to reverse a completed backup step.
enum Undo {
    RemoveLink(PathBuf),
    RenameBack(PathBuf),
    RestoreAside(PathBuf),
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::{FaultyFileSystemOps, FsOp, SystemFileSystemOps};
    use std::fs;

    struct Fixture {
        _tmp: tempfile::TempDir,
        target: PathBuf,
        install: PathBuf,
        backup: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("src/.vimrc");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "managed").unwrap();
        let install = tmp.path().join(".vimrc");
        let backup = tmp.path().join(".vimrc.bak1");
        Fixture {
            _tmp: tmp,
            target,
            install,
            backup,
        }
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(TMP_SUFFIX))
            .collect()
    }

    #[test]
    fn temp_sibling_is_unique_and_hidden() {
        let a = temp_sibling(Path::new("/home/u/.vimrc"));
        let b = temp_sibling(Path::new("/home/u/.vimrc"));
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/home/u")));
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("..vimrc."));
        assert!(name.ends_with(TMP_SUFFIX));
    }

    #[test]
    fn lexists_sees_dangling_links() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("x");
        assert!(!lexists(&p));
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink("/nonexistent", &p).unwrap();
            assert!(lexists(&p));
            assert!(is_symlink(&p));
            assert!(!p.exists());
        }
    }

    #[test]
    fn swap_into_empty_path() {
        let fx = fixture();
        swap_in_symlink(&SystemFileSystemOps, &fx.target, &fx.install, Preserve::Nothing).unwrap();
        assert!(is_symlink(&fx.install));
        assert_eq!(fs::read_to_string(&fx.install).unwrap(), "managed");
    }

    #[test]
    fn swap_backs_up_file() {
        let fx = fixture();
        fs::write(&fx.install, "set nu").unwrap();
        swap_in_symlink(
            &SystemFileSystemOps,
            &fx.target,
            &fx.install,
            Preserve::BackupTo(&fx.backup),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&fx.backup).unwrap(), "set nu");
        assert!(!is_symlink(&fx.backup));
        assert_eq!(fs::read_link(&fx.install).unwrap(), fx.target);
        assert!(leftovers(fx.install.parent().unwrap()).is_empty());
    }

    #[test]
    fn swap_backs_up_directory() {
        let fx = fixture();
        fs::create_dir(&fx.install).unwrap();
        fs::write(fx.install.join("inner"), "keep").unwrap();
        swap_in_symlink(
            &SystemFileSystemOps,
            &fx.target,
            &fx.install,
            Preserve::BackupTo(&fx.backup),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(fx.backup.join("inner")).unwrap(), "keep");
        assert!(is_symlink(&fx.install));
    }

    #[test]
    fn swap_replaces_directory_without_backup() {
        let fx = fixture();
        fs::create_dir(&fx.install).unwrap();
        swap_in_symlink(&SystemFileSystemOps, &fx.target, &fx.install, Preserve::Replace).unwrap();
        assert!(is_symlink(&fx.install));
        assert!(!lexists(&fx.backup));
    }

    #[test]
    fn hard_link_failure_falls_back_to_rename() {
        let fx = fixture();
        fs::write(&fx.install, "set nu").unwrap();
        let ops = FaultyFileSystemOps::new().failing(FsOp::HardLink);
        swap_in_symlink(&ops, &fx.target, &fx.install, Preserve::BackupTo(&fx.backup)).unwrap();
        assert_eq!(fs::read_to_string(&fx.backup).unwrap(), "set nu");
        assert!(is_symlink(&fx.install));
        assert_eq!(
            ops.calls(),
            vec![FsOp::Symlink, FsOp::HardLink, FsOp::Rename, FsOp::Rename]
        );
    }

    #[test]
    fn existing_backup_is_never_clobbered() {
        let fx = fixture();
        fs::write(&fx.install, "set nu").unwrap();
        fs::write(&fx.backup, "older").unwrap();
        let (path, err) = swap_in_symlink(
            &SystemFileSystemOps,
            &fx.target,
            &fx.install,
            Preserve::BackupTo(&fx.backup),
        )
        .unwrap_err();
        assert_eq!(path, fx.install);
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&fx.backup).unwrap(), "older");
        assert_eq!(fs::read_to_string(&fx.install).unwrap(), "set nu");
        assert!(leftovers(fx.install.parent().unwrap()).is_empty());
    }

    #[test]
    fn replaced_directory_leaves_nothing_behind() {
        let fx = fixture();
        fs::create_dir(&fx.install).unwrap();
        fs::write(fx.install.join("init.vim"), "old").unwrap();
        swap_in_symlink(&SystemFileSystemOps, &fx.target, &fx.install, Preserve::Replace).unwrap();
        assert!(is_symlink(&fx.install));
        assert!(leftovers(fx.install.parent().unwrap()).is_empty());
    }

    #[test]
    fn failed_replace_keeps_directory() {
        let fx = fixture();
        fs::create_dir(&fx.install).unwrap();
        fs::write(fx.install.join("init.vim"), "old").unwrap();
        let ops = FaultyFileSystemOps::new().failing(FsOp::Rename);
        assert!(swap_in_symlink(&ops, &fx.target, &fx.install, Preserve::Replace).is_err());
        assert!(is_real_dir(&fx.install));
        assert_eq!(fs::read_to_string(fx.install.join("init.vim")).unwrap(), "old");
        assert!(leftovers(fx.install.parent().unwrap()).is_empty());
    }

    #[test]
    fn failed_final_rename_restores_replaced_directory() {
        let fx = fixture();
        fs::create_dir(&fx.install).unwrap();
        fs::write(fx.install.join("init.vim"), "old").unwrap();
        // Rename #0 moves the directory aside, #1 (the swap) fails, #2 restores it.
        let ops = FaultyFileSystemOps::new().failing_call(FsOp::Rename, 1);
        assert!(swap_in_symlink(&ops, &fx.target, &fx.install, Preserve::Replace).is_err());
        assert!(is_real_dir(&fx.install));
        assert_eq!(fs::read_to_string(fx.install.join("init.vim")).unwrap(), "old");
        assert!(leftovers(fx.install.parent().unwrap()).is_empty());
        assert!(!ops.calls().contains(&FsOp::RemoveDirAll));
    }

    #[test]
    fn symlink_failure_changes_nothing() {
        let fx = fixture();
        fs::write(&fx.install, "set nu").unwrap();
        let ops = FaultyFileSystemOps::new().failing(FsOp::Symlink);
        let (path, err) =
            swap_in_symlink(&ops, &fx.target, &fx.install, Preserve::BackupTo(&fx.backup))
                .unwrap_err();
        assert!(path.to_string_lossy().ends_with(TMP_SUFFIX));
        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
        assert_eq!(fs::read_to_string(&fx.install).unwrap(), "set nu");
        assert!(!lexists(&fx.backup));
    }

    #[test]
    fn final_rename_failure_rolls_back_backup() {
        let fx = fixture();
        fs::write(&fx.install, "set nu").unwrap();
        let ops = FaultyFileSystemOps::new().failing(FsOp::Rename);
        let (path, _) =
            swap_in_symlink(&ops, &fx.target, &fx.install, Preserve::BackupTo(&fx.backup))
                .unwrap_err();
        assert_eq!(path, fx.install);
        assert!(!is_symlink(&fx.install));
        assert_eq!(fs::read_to_string(&fx.install).unwrap(), "set nu");
        assert!(!lexists(&fx.backup));
        assert!(leftovers(fx.install.parent().unwrap()).is_empty());
    }

    #[test]
    fn final_rename_failure_restores_directory() {
        let fx = fixture();
        fs::create_dir(&fx.install).unwrap();
        fs::write(fx.install.join("inner"), "keep").unwrap();
        // Rename #0 moves the directory to the backup, #1 (the swap) fails,
        // #2 moves it back.
        let ops = FaultyFileSystemOps::new().failing_call(FsOp::Rename, 1);
        assert!(
            swap_in_symlink(&ops, &fx.target, &fx.install, Preserve::BackupTo(&fx.backup))
                .is_err()
        );
        assert!(is_real_dir(&fx.install));
        assert_eq!(fs::read_to_string(fx.install.join("inner")).unwrap(), "keep");
        assert!(!lexists(&fx.backup));
    }
}
