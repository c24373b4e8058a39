//! Command: install every selected module.
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::discovery::{Discovered, discover};
use crate::error::ConfigError;
use crate::install::{self, Context, RunReport};
use crate::logging::{Log, Logger};
use crate::prompt::{NonInteractive, Prompter, TerminalPrompter};

/// Run the install command.
///
/// Descriptor and module failures are reported in the summary but do not
/// fail the command; only setup failures (bad root, unreadable tree) do.
///
/// # Errors
///
/// Returns an error if the source root cannot be resolved or walked.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>, cancelled: Arc<AtomicBool>) -> Result<RunReport> {
    let root = resolve_root(global)?;
    let config = Arc::new(global.run_config());

    log.info(&format!("dotlink {}", super::version::version()));
    log.info(&format!("source root: {}", root.display()));
    if !config.flavors.is_empty() {
        log.info(&format!("flavors: {}", config.flavors.join(", ")));
    }

    log.stage("Discovering modules");
    let discovered = discover(&root, &config)
        .with_context(|| format!("discovering modules under {}", root.display()))?;
    log.info(&format!("found {} module(s)", discovered.len()));
    for module in &discovered {
        if let Discovered::Module(record) = module {
            log.debug(&format!(
                "{}: {} entr{}",
                record.name,
                record.symlinks.len(),
                if record.symlinks.len() == 1 { "y" } else { "ies" }
            ));
        }
    }

    let prompter: Arc<dyn Prompter> = if config.non_interactive {
        Arc::new(NonInteractive)
    } else {
        Arc::new(TerminalPrompter::stdio())
    };
    let ctx = Context::new(
        Arc::clone(&config),
        root,
        Arc::clone(log) as Arc<dyn Log>,
        prompter,
    )
    .with_cancel_flag(cancelled);

    let report = install::run_all(&ctx, log, &discovered);
    if ctx.is_cancelled() {
        log.warn("interrupted; remaining entries were not installed");
    }
    log.print_summary();
    log.info(&format!("entries: {}", report.totals().summary(config.dry_run)));
    Ok(report)
}

/// Determine the source tree root: `--root` (or `DOTLINK_ROOT`, which clap
/// folds into the same option), else the current directory.
///
/// # Errors
///
/// Returns an error if the chosen root is not a directory.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = match &global.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("reading current directory")?,
    };
    check_root(&root)?;
    Ok(dunce::canonicalize(&root).unwrap_or(root))
}

fn check_root(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(ConfigError::MissingRoot(root.to_path_buf()).into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::Parser as _;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["dotlink"];
        argv.extend_from_slice(args);
        argv.push("install");
        crate::cli::Cli::parse_from(argv).global
    }

    #[test]
    fn resolve_root_uses_explicit_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = resolve_root(&global(&["--root", tmp.path().to_str().unwrap()])).unwrap();
        assert_eq!(root, dunce::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn resolve_root_rejects_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = resolve_root(&global(&["--root", missing.to_str().unwrap()])).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn run_installs_and_reports() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(root.join("vim")).unwrap();
        std::fs::create_dir_all(&home).unwrap();
        std::fs::write(root.join("vim/.vimrc"), "set nu").unwrap();
        std::fs::write(
            root.join("vim/dotlink.toml"),
            format!(
                "location = '{}'\nsymlinks = ['.vimrc']\n",
                home.display()
            ),
        )
        .unwrap();

        let opts = global(&["--root", root.to_str().unwrap(), "--non-interactive"]);
        let log = Arc::new(Logger::with_log_file(None));
        let report = run(&opts, &log, Arc::new(AtomicBool::new(false))).unwrap();
        assert_eq!(report.totals().installed, 1);
        assert!(home.join(".vimrc").is_symlink());
        assert_eq!(log.failure_count(), 0);
    }
}
