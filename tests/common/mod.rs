// Shared helpers for integration tests.
//
// Provides a temporary source tree and a temporary "home" directory next to
// it, plus a fluent builder so each test can lay out modules without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dotlink_cli::config::RunConfig;
use dotlink_cli::config::discovery::discover;
use dotlink_cli::install::{self, Context, InstallOutcome, RunReport};
use dotlink_cli::logging::{Log, Logger};
use dotlink_cli::prompt::{NonInteractive, Prompter};

/// An isolated source tree and home directory backed by a
/// [`tempfile::TempDir`], deleted when dropped.
pub struct Fixture {
    tmp: tempfile::TempDir,
    /// Canonical source-tree root.
    pub root: PathBuf,
    /// Canonical stand-in for the user's home directory.
    pub home: PathBuf,
}

impl Fixture {
    /// Create an empty source tree and home directory.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("src")).expect("create source root");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create home");
        let root = dunce::canonicalize(tmp.path().join("src")).expect("canonical root");
        let home = dunce::canonicalize(tmp.path().join("home")).expect("canonical home");
        Self { tmp, root, home }
    }

    /// Path under the source root.
    pub fn source(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Path under the home directory.
    pub fn home(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Write `content` to `rel` under the source root, creating parents.
    pub fn with_source_file(self, rel: &str, content: &str) -> Self {
        write(&self.source(rel), content);
        self
    }

    /// Create an empty directory `rel` under the source root.
    pub fn with_source_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.source(rel)).expect("create source dir");
        self
    }

    /// Write `content` to `rel` under the home directory, creating parents.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.home(rel), content);
        self
    }

    /// Create an empty directory `rel` under the home directory.
    pub fn with_home_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.home(rel)).expect("create home dir");
        self
    }

    /// Write `<module>/dotlink.toml`. `{home}` and `{root}` in `body` are
    /// replaced by the fixture's paths.
    pub fn with_config(self, module: &str, body: &str) -> Self {
        let body = body
            .replace("{home}", &self.home.display().to_string())
            .replace("{root}", &self.root.display().to_string());
        write(&self.source(module).join("dotlink.toml"), &body);
        self
    }

    /// Module `module` installing `entries` straight into the home directory.
    pub fn with_home_module(self, module: &str, entries: &[&str]) -> Self {
        let list = entries
            .iter()
            .map(|e| format!("'{e}'"))
            .collect::<Vec<_>>()
            .join(", ");
        self.with_config(module, &format!("location = '{{home}}'\nsymlinks = [{list}]\n"))
    }

    /// Run a non-interactive install with default options.
    pub fn install(&self) -> RunReport {
        self.run(headless(), Arc::new(NonInteractive))
    }

    /// Discover and install with the given options and prompter.
    pub fn run(&self, config: RunConfig, prompter: Arc<dyn Prompter>) -> RunReport {
        let config = Arc::new(config);
        let discovered = discover(&self.root, &config).expect("discover modules");
        let logger = Arc::new(Logger::with_log_file(None));
        let ctx = Context::new(
            Arc::clone(&config),
            self.root.clone(),
            Arc::clone(&logger) as Arc<dyn Log>,
            prompter,
        );
        install::run_all(&ctx, &logger, &discovered)
    }
}

/// Non-interactive options with everything else at its default.
pub fn headless() -> RunConfig {
    RunConfig {
        non_interactive: true,
        ..RunConfig::default()
    }
}

/// The outcome recorded for descriptor `name`.
pub fn outcome<'a>(report: &'a RunReport, name: &str) -> &'a InstallOutcome {
    &report
        .descriptors()
        .find(|d| d.name == name)
        .expect("descriptor in report")
        .outcome
}

/// Sorted file names in `dir`.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
