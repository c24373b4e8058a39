//! `dotlink` binary entry point.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context as _, Result};
use clap::Parser;

use dotlink_cli::cli::{Cli, Command};
use dotlink_cli::commands;
use dotlink_cli::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match args.command {
        Command::Install => {
            logging::init_subscriber(args.verbose, "install");
            let log = Arc::new(Logger::new("install"));

            let cancelled = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&cancelled);
            ctrlc::set_handler(move || {
                tracing::warn!("interrupt received, stopping after the current entry");
                flag.store(true, Ordering::SeqCst);
            })
            .context("installing interrupt handler")?;

            commands::install::run(&args.global, &log, cancelled)?;
            Ok(())
        }
        Command::Version => commands::version::run(&mut std::io::stdout().lock()),
    }
}
