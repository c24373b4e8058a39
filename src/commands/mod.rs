//! Top-level subcommand orchestration.
pub mod install;
pub mod version;
