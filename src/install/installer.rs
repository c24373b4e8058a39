//! Per-descriptor installation state machine.
//!
//! ```text
//! normalize ─► target exists? ─► resolve path ─► identity check ─► backup decision ─► swap
//!     │              │                 │                │                                │
//!  Skipped     MissingTarget      Skipped/Error    AlreadyLinked          Installed / BackupDeduped
//! ```
//!
//! Every failure is local to its descriptor and comes back as
//! [`InstallOutcome::Error`].
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InstallError;
use crate::resources::ResourceState;
use crate::resources::backup::{BackupChain, BackupDecision};
use crate::resources::helpers::fs::{Preserve, swap_in_symlink};
use crate::resources::symlink::SymlinkResource;

use super::context::Context;
use super::normalize::{Normalization, Normalized};
use super::resolve::{Resolution, resolve_install_path};

/// Final outcome of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The install path already links to the target; nothing changed.
    AlreadyLinked,
    /// The link was created; `backup` holds the previous entry, if any.
    Installed {
        /// Backup written for the previous entry.
        backup: Option<PathBuf>,
    },
    /// The link replaced content the most recent backup already holds.
    BackupDeduped {
        /// The existing backup that made a new one unnecessary.
        backup: PathBuf,
    },
    /// Filtered out or opted out; no filesystem change.
    Skipped {
        /// Why the descriptor was skipped.
        reason: String,
    },
    /// The descriptor failed; no filesystem change.
    Error(InstallError),
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLinked => f.write_str("already linked"),
            Self::Installed { backup: None } => f.write_str("installed"),
            Self::Installed {
                backup: Some(backup),
            } => write!(f, "installed (backup {})", backup.display()),
            Self::BackupDeduped { backup } => {
                write!(f, "installed (identical to {})", backup.display())
            }
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
            Self::Error(err) => write!(f, "error [{}]: {err}", err.kind()),
        }
    }
}

/// One descriptor's outcome plus the paths it was decided on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorReport {
    /// Descriptor name as written in the config (or a placeholder).
    pub name: String,
    /// Source-tree target, once known.
    pub target: Option<PathBuf>,
    /// Install path, once resolved.
    pub install: Option<PathBuf>,
    /// What happened.
    pub outcome: InstallOutcome,
}

impl DescriptorReport {
    /// A report for a descriptor that never got past normalization.
    #[must_use]
    pub fn early(name: impl Into<String>, outcome: InstallOutcome) -> Self {
        Self {
            name: name.into(),
            target: None,
            install: None,
            outcome,
        }
    }

    /// Return `true` if the descriptor ended in an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.outcome, InstallOutcome::Error(_))
    }
}

/// Run the state machine for a descriptor that passed
/// [`normalize`](super::normalize::normalize).
pub fn install_normalized(ctx: &Context, desc: &Normalized) -> DescriptorReport {
    let mut report = DescriptorReport {
        name: desc.source_name.clone(),
        target: Some(desc.target.clone()),
        install: None,
        outcome: InstallOutcome::AlreadyLinked,
    };

    if !desc.target.exists() {
        report.outcome = InstallOutcome::Error(InstallError::MissingTarget {
            target: desc.target.clone(),
        });
        return report;
    }

    let install = match resolve_install_path(desc, &ctx.source_root, ctx.prompter.as_ref()) {
        Ok(Resolution::Install(path)) => path,
        Ok(Resolution::Skip) => {
            report.outcome = InstallOutcome::Skipped {
                reason: "no install path given".to_string(),
            };
            return report;
        }
        Err(err) => {
            report.outcome = InstallOutcome::Error(err);
            return report;
        }
    };

    report.outcome = ctx
        .locks
        .with_lock(&install, || link(ctx, &desc.target, &install));
    report.install = Some(install);
    report
}

/// Turn a normalization result into either a descriptor ready for
/// [`install_normalized`] or a finished report.
///
/// # Errors
///
/// Returns the finished [`DescriptorReport`] for skipped or failed entries.
pub fn ready(
    name: &str,
    normalized: Result<Normalization, InstallError>,
) -> Result<Normalized, DescriptorReport> {
    match normalized {
        Ok(Normalization::Ready(desc)) => Ok(desc),
        Ok(Normalization::Skipped(reason)) => Err(DescriptorReport::early(
            name,
            InstallOutcome::Skipped { reason },
        )),
        Err(err) => Err(DescriptorReport::early(name, InstallOutcome::Error(err))),
    }
}

/// Identity check, backup decision and swap for one resolved install path.
/// Must run under the install path's lock.
fn link(ctx: &Context, target: &Path, install: &Path) -> InstallOutcome {
    let resource = SymlinkResource::new(target.to_path_buf(), install.to_path_buf());
    let (choice, outcome) = match resource.current_state() {
        ResourceState::Correct => return InstallOutcome::AlreadyLinked,
        ResourceState::Invalid { .. } => {
            return InstallOutcome::Error(InstallError::MissingTarget {
                target: target.to_path_buf(),
            });
        }
        ResourceState::Missing => (Choice::Nothing, InstallOutcome::Installed { backup: None }),
        ResourceState::Incorrect { current } => {
            ctx.log.debug(&format!("{} is {current}", install.display()));
            match BackupChain::scan(install).decide(install, target) {
                BackupDecision::Write(next) => (
                    Choice::Backup(next.clone()),
                    InstallOutcome::Installed { backup: Some(next) },
                ),
                BackupDecision::Dedup(recent) => (
                    Choice::Replace,
                    InstallOutcome::BackupDeduped { backup: recent },
                ),
            }
        }
    };

    if ctx.dry_run() {
        ctx.log.dry_run(&describe_plan(&resource, &choice));
        return outcome;
    }

    let preserve = match &choice {
        Choice::Nothing => Preserve::Nothing,
        Choice::Replace => Preserve::Replace,
        Choice::Backup(next) => Preserve::BackupTo(next),
    };
    match swap_in_symlink(ctx.fs_ops.as_ref(), target, install, preserve) {
        Ok(()) => outcome,
        Err((path, err)) => InstallOutcome::Error(InstallError::io(path, &err)),
    }
}

/// Owned form of [`Preserve`], decided before the swap.
enum Choice {
    Nothing,
    Replace,
    Backup(PathBuf),
}

fn describe_plan(resource: &SymlinkResource, choice: &Choice) -> String {
    match choice {
        Choice::Nothing => format!("would link {}", resource.description()),
        Choice::Replace => format!(
            "would link {} (current content already backed up)",
            resource.description()
        ),
        Choice::Backup(next) => format!(
            "would back up to {} and link {}",
            next.display(),
            resource.description()
        ),
    }
}
