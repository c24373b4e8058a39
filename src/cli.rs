//! Command-line surface.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RunConfig;

/// Top-level CLI entry point for the dotfiles symlink installer.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Install modular dotfiles as symlinks, keeping numbered backups",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Override the source tree root (defaults to $DOTLINK_ROOT, then the
    /// current directory)
    #[arg(long, global = true, env = "DOTLINK_ROOT")]
    pub root: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Never prompt; questions get no answer and confirmations default to yes
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Install only these modules
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Never install these modules
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub exclude_modules: Vec<String>,

    /// Active flavors
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub flavors: Vec<String>,

    /// Ask once per module for a base path instead of once per file
    #[arg(long, global = true)]
    pub cache_module_location: bool,

    /// Disable parallel module installation (parallel is enabled by default
    /// and only used with --non-interactive)
    #[arg(long = "no-parallel", global = true, action = clap::ArgAction::SetFalse)]
    pub parallel: bool,
}

impl GlobalOpts {
    /// Build the run configuration these flags describe.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            dry_run: self.dry_run,
            non_interactive: self.non_interactive,
            flavors: self.flavors.clone(),
            modules: self.modules.clone(),
            exclude_modules: self.exclude_modules.clone(),
            cache_module_location: self.cache_module_location,
            parallel: self.parallel,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install every selected module
    Install,
    /// Print version information
    Version,
}
