//! Symlink inference from a module directory's contents.
use std::io;
use std::path::Path;

use super::module::SymlinkEntry;
use super::toml_loader::CONFIG_FILES;

/// Editor and OS droppings that are never linked.
const TRANSIENT_PATTERNS: [&str; 3] = ["*.*~", "*.swp", ".DS_Store"];

/// Return `true` if `name` matches one of the transient file patterns.
#[must_use]
pub fn is_transient(name: &str) -> bool {
    TRANSIENT_PATTERNS.iter().any(|pattern| {
        glob::Pattern::new(pattern).is_ok_and(|compiled| compiled.matches(name))
    })
}

/// List the entries of `dir` that inference would link, sorted by name.
///
/// The module's own config files, transient files, and names that are not
/// valid UTF-8 are left out.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn infer_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if CONFIG_FILES.contains(&name.as_str()) || is_transient(&name) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Merge explicit entries with inferred names.
///
/// Explicit entries keep their order and come first; inferred names already
/// covered by an explicit entry (compared after stripping trailing
/// separators) are dropped.
#[must_use]
pub fn merge(explicit: Vec<SymlinkEntry>, inferred: Vec<String>) -> Vec<SymlinkEntry> {
    let known: Vec<String> = explicit
        .iter()
        .filter_map(SymlinkEntry::name)
        .map(|name| trim_separators(name).to_string())
        .collect();
    let mut merged = explicit;
    for name in inferred {
        if !known.iter().any(|k| *k == name) {
            merged.push(SymlinkEntry::Name(name));
        }
    }
    merged
}

fn trim_separators(name: &str) -> &str {
    name.trim_end_matches(['/', std::path::MAIN_SEPARATOR])
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::module::SymlinkSpec;
    use std::fs;

    #[test]
    fn transient_patterns() {
        assert!(is_transient("notes.txt~"));
        assert!(is_transient(".vimrc.swp"));
        assert!(is_transient(".DS_Store"));
        assert!(!is_transient(".vimrc"));
        assert!(!is_transient("a.txt"));
        assert!(!is_transient("backup~"));
    }

    #[test]
    fn infers_everything_but_config_and_transients() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", ".a.txt.swp", "dotlink.toml", "dotlink.local.toml"] {
            fs::write(tmp.path().join(name), "x").unwrap();
        }
        fs::create_dir(tmp.path().join("nvim")).unwrap();
        let names = infer_entries(tmp.path()).unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "nvim"]);
    }

    #[test]
    fn infer_missing_dir_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(infer_entries(&tmp.path().join("absent")).is_err());
    }

    #[test]
    fn merge_puts_explicit_first_and_dedups() {
        let explicit = vec![
            SymlinkEntry::from("b.txt"),
            SymlinkEntry::Detailed(SymlinkSpec::named("nvim/")),
        ];
        let merged = merge(
            explicit,
            vec!["a.txt".to_string(), "b.txt".to_string(), "nvim".to_string()],
        );
        let names: Vec<_> = merged.iter().map(|e| e.name().unwrap()).collect();
        assert_eq!(names, vec!["b.txt", "nvim/", "a.txt"]);
    }

    #[test]
    fn merge_keeps_malformed_entries() {
        let merged = merge(
            vec![SymlinkEntry::Malformed("bad".to_string())],
            vec!["a.txt".to_string()],
        );
        assert_eq!(merged.len(), 2);
    }
}
