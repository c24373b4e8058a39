//! User path expansion: `~` and environment variables.
use std::path::PathBuf;

/// Expand a user-supplied path string.
///
/// A leading `~` (alone or followed by a separator) becomes the home
/// directory. `$VAR` and `${VAR}` are replaced with the value of the
/// environment variable; unknown variables are left as written.
///
/// # Examples
///
/// ```
/// use dotlink_cli::config::paths::expand_path;
///
/// assert_eq!(expand_path("/etc/hosts").to_str(), Some("/etc/hosts"));
/// ```
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    let vars = expand_vars(raw, |name| std::env::var(name).ok());
    expand_tilde(&vars)
}

fn expand_tilde(raw: &str) -> PathBuf {
    let Some(rest) = raw.strip_prefix('~') else {
        return PathBuf::from(raw);
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with(std::path::MAIN_SEPARATOR)) {
        return PathBuf::from(raw);
    }
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(raw);
    };
    let rest = rest.trim_start_matches(['/', std::path::MAIN_SEPARATOR]);
    if rest.is_empty() {
        home
    } else {
        home.join(rest)
    }
}

/// Replace `$NAME` and `${NAME}` using `lookup`.
pub(crate) fn expand_vars(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some((head, tail)) = rest.split_once('$') {
        out.push_str(head);
        if let Some(braced) = tail.strip_prefix('{')
            && let Some((name, after)) = braced.split_once('}')
        {
            match lookup(name).filter(|_| !name.is_empty()) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = after;
            continue;
        }
        let len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        let (name, after) = tail.split_at(len);
        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = after;
    }
    out.push_str(rest);
    out
}
