//! Buffered logger for parallel module execution.
use std::sync::{Arc, Mutex};

use super::logger::{Logger, emit_descriptor};
use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{DescriptorEvent, Log, ModuleStatus};

/// A single buffered log entry, replayed when flushed.
#[derive(Debug, Clone)]
enum LogEntry {
    Stage(String),
    Info(String),
    Debug(String),
    Warn(String),
    Error(String),
    DryRun(String),
    Descriptor(DescriptorEvent),
}

impl LogEntry {
    /// Replay this entry to the console and log file via tracing.
    fn replay(&self) {
        match self {
            Self::Stage(msg) => tracing::info!(target: STAGE_TARGET, "{msg}"),
            Self::Info(msg) => tracing::info!("{msg}"),
            Self::Debug(msg) => tracing::debug!("{msg}"),
            Self::Warn(msg) => tracing::warn!("{msg}"),
            Self::Error(msg) => tracing::error!("{msg}"),
            Self::DryRun(msg) => tracing::info!(target: DRY_RUN_TARGET, "{msg}"),
            Self::Descriptor(event) => emit_descriptor(event),
        }
    }
}

/// Implement the display methods of [`Log`] by buffering each message into
/// `self.entries` as the corresponding [`LogEntry`] variant.
macro_rules! buffer_log_methods {
    ($($method:ident => $variant:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                if let Ok(mut guard) = self.entries.lock() {
                    guard.push(LogEntry::$variant(msg.to_string()));
                }
            }
        )+
    };
}

/// Buffered logger for parallel module execution.
///
/// Captures display output in memory so that modules installed concurrently
/// do not interleave their console output.  The captured entries are replayed
/// in order when [`flush`](Self::flush) is called; the parallel runner flushes
/// modules in their input order so the log reads the same as a sequential run.
///
/// [`record_module`](Log::record_module) is forwarded directly to the
/// underlying [`Logger`] because the summary collection is already
/// thread-safe.
#[derive(Debug)]
pub struct BufferedLog {
    inner: Arc<Logger>,
    entries: Mutex<Vec<LogEntry>>,
}

impl BufferedLog {
    /// Create a new buffered logger backed by the given [`Logger`].
    #[must_use]
    pub const fn new(inner: Arc<Logger>) -> Self {
        Self {
            inner,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Replay all buffered entries through the backing [`Logger`]'s output.
    ///
    /// Holds the logger's flush lock so two flushes never interleave.
    pub fn flush(&self) {
        let _guard = self
            .inner
            .flush_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let entries = match self.entries.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => return,
        };
        for entry in &entries {
            entry.replay();
        }
    }
}

impl Log for BufferedLog {
    buffer_log_methods! {
        stage   => Stage,
        info    => Info,
        debug   => Debug,
        warn    => Warn,
        error   => Error,
        dry_run => DryRun,
    }

    fn descriptor(&self, event: &DescriptorEvent) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(LogEntry::Descriptor(event.clone()));
        }
    }

    fn record_module(&self, name: &str, status: ModuleStatus, message: Option<&str>) {
        self.inner.record_module(name, status, message);
    }
}
