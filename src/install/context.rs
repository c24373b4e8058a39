use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::RunConfig;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::prompt::Prompter;

use super::locks::PathLocks;

/// Shared context for an installation run.
pub struct Context {
    /// Options for this run.
    pub config: Arc<RunConfig>,
    /// Root of the managed source tree.
    pub source_root: PathBuf,
    /// Logger for output and module recording.
    pub log: Arc<dyn Log>,
    /// Collaborator that answers location and confirmation questions.
    pub prompter: Arc<dyn Prompter>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// One lock per install path, shared by every module of the run.
    pub locks: Arc<PathLocks>,
    /// Set by the interrupt handler; checked between descriptors.
    pub cancelled: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("source_root", &self.source_root)
            .field("log", &"<dyn Log>")
            .field("prompter", &self.prompter)
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("locks", &self.locks.len())
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

impl Context {
    /// Create a context that operates on the real filesystem.
    #[must_use]
    pub fn new(
        config: Arc<RunConfig>,
        source_root: PathBuf,
        log: Arc<dyn Log>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            config,
            source_root,
            log,
            prompter,
            fs_ops: Arc::new(SystemFileSystemOps),
            locks: Arc::new(PathLocks::new()),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether to decide without mutating.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Return `true` once an interrupt has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Share `flag` as this run's cancellation flag.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Create a copy of this context with a different logger.
    ///
    /// All other fields are cloned by reference (via `Arc`). The parallel
    /// runner uses this to give each module its own buffered logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            source_root: self.source_root.clone(),
            log,
            prompter: Arc::clone(&self.prompter),
            fs_ops: Arc::clone(&self.fs_ops),
            locks: Arc::clone(&self.locks),
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Create a copy of this context with a different [`FileSystemOps`]
    /// implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }
}
