//! Per-module outcome counters.
use super::installer::InstallOutcome;

/// Counts of descriptor outcomes.
///
/// # Examples
///
/// ```
/// use dotlink_cli::install::OutcomeStats;
///
/// let stats = OutcomeStats { installed: 2, already_linked: 5, ..OutcomeStats::default() };
/// assert_eq!(stats.summary(false), "2 installed, 5 already linked");
/// assert_eq!(stats.summary(true), "2 would install, 5 already linked");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeStats {
    /// Links created (with or without a new backup).
    pub installed: u32,
    /// Install paths that already linked to their target.
    pub already_linked: u32,
    /// Links created over content already held by the latest backup.
    pub deduped: u32,
    /// Descriptors filtered out or skipped at a prompt.
    pub skipped: u32,
    /// Descriptors that ended in an error.
    pub failed: u32,
}

impl OutcomeStats {
    /// Count one outcome.
    pub const fn record(&mut self, outcome: &InstallOutcome) {
        match outcome {
            InstallOutcome::AlreadyLinked => self.already_linked += 1,
            InstallOutcome::Installed { .. } => self.installed += 1,
            InstallOutcome::BackupDeduped { .. } => self.deduped += 1,
            InstallOutcome::Skipped { .. } => self.skipped += 1,
            InstallOutcome::Error(_) => self.failed += 1,
        }
    }

    /// Total number of descriptors counted.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.installed + self.already_linked + self.deduped + self.skipped + self.failed
    }

    /// Format the summary (e.g. "1 installed, 3 already linked, 1 failed").
    ///
    /// Installed and already-linked counts are always shown; the others only
    /// when non-zero.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would install" } else { "installed" };
        let mut parts = vec![
            format!("{} {verb}", self.installed),
            format!("{} already linked", self.already_linked),
        ];
        for (count, label) in [
            (self.deduped, "deduped"),
            (self.skipped, "skipped"),
            (self.failed, "failed"),
        ] {
            if count > 0 {
                parts.push(format!("{count} {label}"));
            }
        }
        parts.join(", ")
    }
}

impl std::ops::AddAssign for OutcomeStats {
    fn add_assign(&mut self, other: Self) {
        self.installed += other.installed;
        self.already_linked += other.already_linked;
        self.deduped += other.deduped;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}
