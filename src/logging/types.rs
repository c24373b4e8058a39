//! Core logging types: module entries, status, and the [`Log`] trait.

/// Module installation result for summary reporting.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    /// Module name (path relative to the source root).
    pub name: String,
    /// Final status of the module.
    pub status: ModuleStatus,
    /// Optional detail message (e.g., skip reason or outcome counts).
    pub message: Option<String>,
}

/// Status of a processed module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// Every descriptor finished without error.
    Ok,
    /// The module was filtered out (disabled, flavors, declined, empty).
    Skipped,
    /// The module ran in dry-run mode; no changes were applied.
    DryRun,
    /// At least one descriptor failed, or the module config could not be loaded.
    Failed,
}

/// Severity of a [`DescriptorEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    /// Nothing changed (already linked, skipped).
    Debug,
    /// A link was installed.
    Info,
    /// The descriptor failed.
    Error,
}

/// One descriptor outcome, carried as fields so the log file can record
/// them individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorEvent {
    /// Severity the event is logged at.
    pub level: EventLevel,
    /// Descriptor name as written in the module config.
    pub name: String,
    /// Rendered outcome (e.g. `installed (backup /h/.vimrc.bak1)`).
    pub outcome: String,
    /// Error kind label for failed descriptors.
    pub kind: Option<String>,
    /// Resolved install path, once known.
    pub install: Option<String>,
    /// Source-tree target, once known.
    pub target: Option<String>,
}

impl DescriptorEvent {
    /// Human-readable line: `name: outcome [install -> target]`.
    #[must_use]
    pub fn message(&self) -> String {
        let paths = match (&self.install, &self.target) {
            (Some(install), Some(target)) => format!(" [{install} -> {target}]"),
            (None, Some(target)) => format!(" [target {target}]"),
            _ => String::new(),
        };
        format!("{}: {}{paths}", self.name, self.outcome)
    }
}

/// Abstraction over logging backends.
///
/// Both [`Logger`](super::logger::Logger) (direct output) and
/// [`BufferedLog`](super::buffered::BufferedLog) (deferred output for
/// parallel module runs) implement this trait, allowing installer code to log
/// without knowing whether output is immediate or buffered.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Log one descriptor outcome with its fields.
    fn descriptor(&self, event: &DescriptorEvent);
    /// Record a module result for the summary.
    fn record_module(&self, name: &str, status: ModuleStatus, message: Option<&str>);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn module_status_equality() {
        assert_eq!(ModuleStatus::Ok, ModuleStatus::Ok);
        assert_ne!(ModuleStatus::Ok, ModuleStatus::Failed);
        assert_ne!(ModuleStatus::Skipped, ModuleStatus::DryRun);
    }

    fn event(install: Option<&str>, target: Option<&str>) -> DescriptorEvent {
        DescriptorEvent {
            level: EventLevel::Info,
            name: ".vimrc".to_string(),
            outcome: "installed".to_string(),
            kind: None,
            install: install.map(String::from),
            target: target.map(String::from),
        }
    }

    #[test]
    fn descriptor_message_shows_known_paths() {
        assert_eq!(
            event(Some("/h/.vimrc"), Some("/s/vim/.vimrc")).message(),
            ".vimrc: installed [/h/.vimrc -> /s/vim/.vimrc]"
        );
        assert_eq!(
            event(None, Some("/s/vim/.vimrc")).message(),
            ".vimrc: installed [target /s/vim/.vimrc]"
        );
        assert_eq!(event(None, None).message(), ".vimrc: installed");
    }

    #[test]
    fn module_entry_clone() {
        let entry = ModuleEntry {
            name: "vim".to_string(),
            status: ModuleStatus::Ok,
            message: Some("1 installed".to_string()),
        };
        let cloned = entry.clone();
        assert_eq!(cloned.name, entry.name);
        assert_eq!(cloned.status, entry.status);
        assert_eq!(cloned.message, entry.message);
    }
}
