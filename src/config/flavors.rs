//! Flavor filtering for modules and symlink descriptors.

/// Check whether an entry's required flavors admit the active flavor set.
///
/// An empty requirement list is unconditional. Otherwise at least one of the
/// required flavors must be active (the two sets must intersect). Flavors are
/// compared by value.
///
/// # Examples
///
/// ```
/// use dotlink_cli::config::flavors::admits;
///
/// let required = vec!["work".to_string()];
/// let active = vec!["home".to_string(), "work".to_string()];
///
/// assert!(admits(&required, &active));
/// assert!(!admits(&required, &["home".to_string()]));
/// assert!(admits(&[], &[]));
/// ```
#[must_use]
pub fn admits(required: &[String], active: &[String]) -> bool {
    required.is_empty() || required.iter().any(|flavor| active.contains(flavor))
}
