//! Domain-specific error types for the symlink installation engine.
//!
//! Internal modules return typed errors ([`InstallError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! InstallError  — per-descriptor failures; never abort the run
//! ConfigError   — module discovery and config-file loading
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single symlink descriptor.
///
/// Every variant is local to its descriptor: the installer records it and
/// moves on to the next entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    /// The descriptor has the wrong shape (e.g. a table without `symlink`).
    #[error("malformed symlink descriptor: {reason}")]
    MalformedDescriptor {
        /// What is wrong with the descriptor.
        reason: String,
    },

    /// The descriptor's name is empty after stripping trailing separators.
    #[error("symlink name is empty")]
    EmptyName,

    /// The source-tree target does not exist; linking would dangle.
    #[error("target {} does not exist", target.display())]
    MissingTarget {
        /// Path inside the source tree that was expected to exist.
        target: PathBuf,
    },

    /// An install location was required but nobody could provide one.
    #[error("no install location provided for {name}")]
    NoLocationProvided {
        /// Leaf name of the descriptor being resolved.
        name: String,
    },

    /// The parent directory of the install path does not exist.
    #[error("parent directory of {} does not exist", path.display())]
    MissingParentDir {
        /// The rejected install path.
        path: PathBuf,
    },

    /// The install path lies inside the managed source tree.
    #[error("{} is inside the managed source tree {}", path.display(), root.display())]
    PathInsideSourceTree {
        /// The rejected install path.
        path: PathBuf,
        /// The source-tree root it falls under.
        root: PathBuf,
    },

    /// A filesystem operation failed while swapping in the link.
    #[error("I/O failure at {}: {message}", path.display())]
    IoFailure {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Rendered underlying error.
        message: String,
    },
}

impl InstallError {
    /// Build an [`InstallError::IoFailure`] from an [`std::io::Error`].
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Return the payload-free [`ErrorKind`] of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedDescriptor { .. } => ErrorKind::MalformedDescriptor,
            Self::EmptyName => ErrorKind::EmptyName,
            Self::MissingTarget { .. } => ErrorKind::MissingTarget,
            Self::NoLocationProvided { .. } => ErrorKind::NoLocationProvided,
            Self::MissingParentDir { .. } => ErrorKind::MissingParentDir,
            Self::PathInsideSourceTree { .. } => ErrorKind::PathInsideSourceTree,
            Self::IoFailure { .. } => ErrorKind::IoFailure,
        }
    }
}

/// Payload-free classification of an [`InstallError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`InstallError::MalformedDescriptor`].
    MalformedDescriptor,
    /// See [`InstallError::EmptyName`].
    EmptyName,
    /// See [`InstallError::MissingTarget`].
    MissingTarget,
    /// See [`InstallError::NoLocationProvided`].
    NoLocationProvided,
    /// See [`InstallError::MissingParentDir`].
    MissingParentDir,
    /// See [`InstallError::PathInsideSourceTree`].
    PathInsideSourceTree,
    /// See [`InstallError::IoFailure`].
    IoFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MalformedDescriptor => "malformed-descriptor",
            Self::EmptyName => "empty-name",
            Self::MissingTarget => "missing-target",
            Self::NoLocationProvided => "no-location",
            Self::MissingParentDir => "missing-parent",
            Self::PathInsideSourceTree => "inside-source-tree",
            Self::IoFailure => "io-failure",
        };
        f.write_str(s)
    }
}

/// Errors that arise from module discovery and config-file loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The source root does not exist or is not a directory.
    #[error("source root {} is not a directory", .0.display())]
    MissingRoot(PathBuf),

    /// A module config file contains invalid TOML or has the wrong shape.
    #[error("invalid config {}: {message}", path.display())]
    Parse {
        /// Config file that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading the source tree.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    // -----------------------------------------------------------------------
    // InstallError
    // -----------------------------------------------------------------------

    #[test]
    fn missing_target_display() {
        let e = InstallError::MissingTarget {
            target: PathBuf::from("/src/vim/.vimrc"),
        };
        assert_eq!(e.to_string(), "target /src/vim/.vimrc does not exist");
    }

    #[test]
    fn inside_source_tree_display() {
        let e = InstallError::PathInsideSourceTree {
            path: PathBuf::from("/src/vim/x"),
            root: PathBuf::from("/src"),
        };
        assert_eq!(
            e.to_string(),
            "/src/vim/x is inside the managed source tree /src"
        );
    }

    #[test]
    fn io_helper_captures_message() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let e = InstallError::io("/home/u/.vimrc", &err);
        assert_eq!(e.kind(), ErrorKind::IoFailure);
        assert!(e.to_string().contains("permission denied"));
        assert!(e.to_string().contains("/home/u/.vimrc"));
    }

    #[test]
    fn kind_maps_every_variant() {
        let cases = [
            (
                InstallError::MalformedDescriptor {
                    reason: "x".into(),
                },
                ErrorKind::MalformedDescriptor,
            ),
            (InstallError::EmptyName, ErrorKind::EmptyName),
            (
                InstallError::NoLocationProvided { name: "a".into() },
                ErrorKind::NoLocationProvided,
            ),
            (
                InstallError::MissingParentDir {
                    path: PathBuf::from("/nope/a"),
                },
                ErrorKind::MissingParentDir,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn error_kind_display_is_kebab_case() {
        assert_eq!(
            ErrorKind::PathInsideSourceTree.to_string(),
            "inside-source-tree"
        );
        assert_eq!(ErrorKind::MissingTarget.to_string(), "missing-target");
    }

    // -----------------------------------------------------------------------
    // ConfigError
    // -----------------------------------------------------------------------

    #[test]
    fn config_error_parse_display() {
        let e = ConfigError::Parse {
            path: PathBuf::from("/src/vim/dotlink.toml"),
            message: "expected `=`".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid config /src/vim/dotlink.toml: expected `=`"
        );
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: PathBuf::from("/src"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
    }

    // -----------------------------------------------------------------------
    // Send + Sync bounds
    // -----------------------------------------------------------------------

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<InstallError>();
        assert_send_sync::<ConfigError>();
    }

    #[test]
    fn config_error_converts_to_anyhow() {
        let e = ConfigError::MissingRoot(PathBuf::from("/nope"));
        let anyhow_err: anyhow::Error = e.into();
        assert!(anyhow_err.to_string().contains("/nope"));
    }
}
