//! Command: print version information.
use std::io::Write;

use anyhow::{Context as _, Result};

/// The version string: `DOTLINK_VERSION` at build time, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "dotlink {}", version()).context("writing version")
}
