//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DESCRIPTOR_TARGET, DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{DescriptorEvent, EventLevel, Log, ModuleEntry, ModuleStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record_module` method is **not** included because its signature
/// differs from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/dotlink/<command>.log` (default `~/.cache/dotlink/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    modules: Mutex<Vec<ModuleEntry>>,
    log_file: Option<PathBuf>,
    /// Serializes console replay of buffered module output.
    pub(super) flush_lock: Mutex<()>,
}

// Display methods route through tracing; `self` keeps them on the `Log` surface.
#[allow(clippy::unused_self)]
impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` as its log location.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            modules: Mutex::new(Vec::new()),
            log_file,
            flush_lock: Mutex::new(()),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded module entries.
    #[must_use]
    pub fn module_entries(&self) -> Vec<ModuleEntry> {
        self.modules.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Log one descriptor outcome. The console shows the rendered line; the
    /// log file also gets the outcome, error kind and paths as fields.
    pub fn descriptor(&self, event: &DescriptorEvent) {
        emit_descriptor(event);
    }

    /// Record a module result for the summary.
    pub fn record_module(&self, name: &str, status: ModuleStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.modules.lock() {
            guard.push(ModuleEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed modules.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.modules.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|m| m.status == ModuleStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded modules.
    pub fn print_summary(&self) {
        let modules = self.module_entries();
        if modules.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for module in &modules {
            let (icon, color) = match module.status {
                ModuleStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                ModuleStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                ModuleStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                ModuleStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = module
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", module.name));
        }

        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} modules: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// Emit `event` through tracing at its level.
pub(super) fn emit_descriptor(event: &DescriptorEvent) {
    let msg = event.message();
    let entry = event.name.as_str();
    let outcome = event.outcome.as_str();
    let kind = event.kind.as_deref().unwrap_or("-");
    let install = event.install.as_deref().unwrap_or("-");
    let target_path = event.target.as_deref().unwrap_or("-");
    match event.level {
        EventLevel::Debug => tracing::debug!(
            target: DESCRIPTOR_TARGET,
            entry, outcome, kind, install, target_path, "{msg}"
        ),
        EventLevel::Info => tracing::info!(
            target: DESCRIPTOR_TARGET,
            entry, outcome, kind, install, target_path, "{msg}"
        ),
        EventLevel::Error => tracing::error!(
            target: DESCRIPTOR_TARGET,
            entry, outcome, kind, install, target_path, "{msg}"
        ),
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn descriptor(&self, event: &DescriptorEvent) {
        self.descriptor(event);
    }

    fn record_module(&self, name: &str, status: ModuleStatus, message: Option<&str>) {
        self.record_module(name, status, message);
    }
}
