//! Symlink installation engine for modular dotfiles.
//!
//! Each module is a directory in a version-controlled source tree. Its
//! entries are installed on the local machine as symbolic links into that
//! tree; whatever lived at an install path before is kept in a dense,
//! deduplicated `.bak<N>` chain, and the link is swapped in atomically.
//! Re-running an install is a no-op.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** — run options, module records, TOML config files, discovery
//! - **[`resources`]** — filesystem primitives: backups, deep comparison,
//!   symlink state, the atomic swap and the source-tree guard
//! - **[`install`]** — descriptor normalization, path resolution, the
//!   installer state machine and the module runners
//! - **[`prompt`]** — interactive and headless answers to location questions
//! - **[`commands`]** — top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod install;
pub mod logging;
pub mod operations;
pub mod prompt;
pub mod resources;
