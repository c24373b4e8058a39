//! Path resolution: base + middle segments + leaf → validated install path.
use std::path::{Path, PathBuf};

use crate::config::Location;
use crate::config::paths::expand_path;
use crate::error::InstallError;
use crate::prompt::{PromptAnswer, Prompter};
use crate::resources::guard::ensure_outside_source;

use super::normalize::Normalized;

/// Outcome of resolving an install path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Install the link here.
    Install(PathBuf),
    /// The user opted out at a prompt.
    Skip,
}

/// Compute and validate the install path for `desc`.
///
/// The candidate is built from `desc.base`, `desc.middle` and `desc.leaf`,
/// then checked: its parent directory must exist and it must not lie inside
/// `source_root` (see [`ensure_outside_source`]). A rejected candidate is
/// handed back to `prompter` with the rejection reason until an answer is
/// valid or the user skips.
///
/// # Errors
///
/// [`InstallError::NoLocationProvided`] when a location must be asked for and
/// the prompter cannot answer; the rejection itself
/// ([`InstallError::MissingParentDir`] or
/// [`InstallError::PathInsideSourceTree`]) when a candidate is invalid and the
/// prompter cannot offer another.
pub fn resolve_install_path(
    desc: &Normalized,
    source_root: &Path,
    prompter: &dyn Prompter,
) -> Result<Resolution, InstallError> {
    let candidate = match candidate(desc) {
        Some(path) => path,
        None => match prompter.install_path(&desc.leaf, None) {
            PromptAnswer::Path(path) => path,
            PromptAnswer::Skip => return Ok(Resolution::Skip),
            PromptAnswer::Unavailable => {
                return Err(InstallError::NoLocationProvided {
                    name: desc.leaf.clone(),
                });
            }
        },
    };

    let mut candidate = absolute(candidate);
    loop {
        let Err(rejection) = validate(&candidate, source_root) else {
            return Ok(Resolution::Install(candidate));
        };
        match prompter.install_path(&desc.leaf, Some(&rejection.to_string())) {
            PromptAnswer::Path(path) => candidate = absolute(path),
            PromptAnswer::Skip => return Ok(Resolution::Skip),
            PromptAnswer::Unavailable => return Err(rejection),
        }
    }
}

/// Build the install path from the descriptor alone; `None` means the
/// location has to be asked for.
fn candidate(desc: &Normalized) -> Option<PathBuf> {
    let Location::Fixed(base) = &desc.base else {
        return None;
    };
    if desc.middle.is_empty() {
        return (!base.as_os_str().is_empty()).then(|| base.join(&desc.leaf));
    }
    if desc.middle.starts_with(['/', '~', '.']) || Path::new(&desc.middle).is_absolute() {
        return Some(expand_path(&desc.middle).join(&desc.leaf));
    }
    Some(base.join(&desc.middle).join(&desc.leaf))
}

/// Reject candidates whose parent is missing or that alias the source tree.
fn validate(candidate: &Path, source_root: &Path) -> Result<(), InstallError> {
    if !candidate.parent().is_some_and(Path::is_dir) {
        return Err(InstallError::MissingParentDir {
            path: candidate.to_path_buf(),
        });
    }
    ensure_outside_source(candidate, source_root)
}

/// Anchor a relative path at the current directory.
fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::path::absolute(&path).unwrap_or(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::prompt::{NonInteractive, ScriptedPrompter};
    use std::fs;

    struct Fixture {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        home: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        let home = tmp.path().join("home");
        fs::create_dir_all(root.join("vim")).unwrap();
        fs::create_dir_all(home.join(".config")).unwrap();
        Fixture {
            _tmp: tmp,
            root,
            home,
        }
    }

    fn desc(middle: &str, leaf: &str, base: Location) -> Normalized {
        Normalized {
            source_name: if middle.is_empty() {
                leaf.to_string()
            } else {
                format!("{middle}/{leaf}")
            },
            middle: middle.to_string(),
            leaf: leaf.to_string(),
            base,
            inherits_base: true,
            target: PathBuf::from("/unused"),
        }
    }

    #[test]
    fn fixed_base_joins_leaf() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::Fixed(fx.home.clone()));
        assert_eq!(
            resolve_install_path(&d, &fx.root, &NonInteractive).unwrap(),
            Resolution::Install(fx.home.join(".vimrc"))
        );
    }

    #[test]
    fn relative_middle_joins_base() {
        let fx = fixture();
        let d = desc(".config", "nvim", Location::Fixed(fx.home.clone()));
        // `.config` starts with `.`, so it is taken relative to the cwd, not
        // the base; a plain segment joins the base.
        let d_plain = desc("config", "nvim", Location::Fixed(fx.home.clone()));
        fs::create_dir_all(fx.home.join("config")).unwrap();
        assert_eq!(
            resolve_install_path(&d_plain, &fx.root, &NonInteractive).unwrap(),
            Resolution::Install(fx.home.join("config/nvim"))
        );
        assert_eq!(
            candidate(&d),
            Some(PathBuf::from(".config").join("nvim"))
        );
    }

    #[test]
    fn absolute_middle_ignores_base() {
        let fx = fixture();
        let middle = fx.home.join(".config");
        let d = desc(
            middle.to_str().unwrap(),
            "nvim",
            Location::Fixed(PathBuf::from("/ignored")),
        );
        assert_eq!(
            resolve_install_path(&d, &fx.root, &NonInteractive).unwrap(),
            Resolution::Install(middle.join("nvim"))
        );
    }

    #[test]
    fn prompt_per_use_without_answer_fails() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::PromptPerUse);
        let err = resolve_install_path(&d, &fx.root, &NonInteractive).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoLocationProvided);
    }

    #[test]
    fn empty_fixed_base_prompts() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::Fixed(PathBuf::new()));
        let prompter = ScriptedPrompter::new().path(PromptAnswer::Path(fx.home.join(".vimrc")));
        assert_eq!(
            resolve_install_path(&d, &fx.root, &prompter).unwrap(),
            Resolution::Install(fx.home.join(".vimrc"))
        );
        assert_eq!(prompter.asked(), vec!["path .vimrc -".to_string()]);
    }

    #[test]
    fn empty_answer_skips() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::PromptPerUse);
        let prompter = ScriptedPrompter::new().path(PromptAnswer::Skip);
        assert_eq!(
            resolve_install_path(&d, &fx.root, &prompter).unwrap(),
            Resolution::Skip
        );
    }

    #[test]
    fn missing_parent_without_answer_fails() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::Fixed(fx.home.join("nope")));
        let err = resolve_install_path(&d, &fx.root, &NonInteractive).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParentDir);
    }

    #[test]
    fn inside_source_tree_reprompts_with_diagnostic() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::Fixed(fx.root.join("vim")));
        let prompter = ScriptedPrompter::new().path(PromptAnswer::Path(fx.home.join(".vimrc")));
        assert_eq!(
            resolve_install_path(&d, &fx.root, &prompter).unwrap(),
            Resolution::Install(fx.home.join(".vimrc"))
        );
        let asked = prompter.asked();
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("inside the managed source tree"));
    }

    #[test]
    fn inside_source_tree_headless_is_error() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::Fixed(fx.root.clone()));
        let err = resolve_install_path(&d, &fx.root, &NonInteractive).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathInsideSourceTree);
    }

    #[test]
    fn reprompts_until_valid() {
        let fx = fixture();
        let d = desc("", ".vimrc", Location::PromptPerUse);
        let prompter = ScriptedPrompter::new()
            .path(PromptAnswer::Path(fx.home.join("missing/.vimrc")))
            .path(PromptAnswer::Path(fx.root.join("vim/.vimrc")))
            .path(PromptAnswer::Path(fx.home.join(".vimrc")));
        assert_eq!(
            resolve_install_path(&d, &fx.root, &prompter).unwrap(),
            Resolution::Install(fx.home.join(".vimrc"))
        );
        assert_eq!(prompter.asked().len(), 3);
    }
}
