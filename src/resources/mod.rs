//! Filesystem primitives used by the installer (check + apply pattern).
pub mod backup;
pub mod compare;
pub mod guard;
pub mod helpers;
pub mod symlink;

/// State of an install path relative to its desired symlink.
///
/// # Examples
///
/// ```
/// use dotlink_cli::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "a regular file".into() };
/// let skip = ResourceState::Invalid { reason: "target does not exist".into() };
///
/// assert_ne!(missing, correct);
/// assert_eq!(correct, ResourceState::Correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing exists at the install path.
    Missing,
    /// The install path already links to the target.
    Correct,
    /// Something else lives at the install path.
    Incorrect {
        /// What currently lives there.
        current: String,
    },
    /// The link cannot be installed (e.g. the target is missing).
    Invalid {
        /// Reason why the link cannot be installed.
        reason: String,
    },
}
