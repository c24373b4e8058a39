//! Per-module runner: module filters, confirmation, descriptor loop.
use crate::config::flavors::admits;
use crate::config::{Location, ModuleRecord};
use crate::logging::{DescriptorEvent, EventLevel, ModuleStatus};
use crate::prompt::PromptAnswer;

use super::context::Context;
use super::installer::{DescriptorReport, InstallOutcome, install_normalized, ready};
use super::normalize::normalize;
use super::stats::OutcomeStats;

/// Question asked before a module's descriptors are installed.
pub const CONFIRM_MODULE: &str = "Install this module?";

/// Everything that happened to one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReport {
    /// Module name relative to the source root.
    pub name: String,
    /// Final module status for the summary.
    pub status: ModuleStatus,
    /// Why the module was skipped or failed as a whole, if it was.
    pub note: Option<String>,
    /// Per-descriptor reports, in descriptor order.
    pub descriptors: Vec<DescriptorReport>,
    /// Counts over `descriptors`.
    pub stats: OutcomeStats,
}

impl ModuleReport {
    /// A module that was not run at all.
    #[must_use]
    pub fn skipped(name: &str, note: impl Into<String>) -> Self {
        Self::whole(name, ModuleStatus::Skipped, note)
    }

    /// A module that failed before any descriptor ran.
    #[must_use]
    pub fn failed(name: &str, note: impl Into<String>) -> Self {
        Self::whole(name, ModuleStatus::Failed, note)
    }

    fn whole(name: &str, status: ModuleStatus, note: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            note: Some(note.into()),
            descriptors: Vec::new(),
            stats: OutcomeStats::default(),
        }
    }

    /// The message shown beside the module in the run summary.
    #[must_use]
    pub fn message(&self, dry_run: bool) -> String {
        self.note
            .clone()
            .unwrap_or_else(|| self.stats.summary(dry_run))
    }
}

/// Install every descriptor of `module`.
///
/// Disabled modules, modules whose flavors are not active and modules with
/// no entries are skipped; otherwise the prompter confirms the module first.
/// Descriptors run in order, each independent of the others. When the run is
/// cancelled, the remaining descriptors are reported as skipped.
pub fn run_module(ctx: &Context, module: &ModuleRecord) -> ModuleReport {
    ctx.log.stage(&module.name);

    if !module.enabled {
        ctx.log.info("module disabled");
        return ModuleReport::skipped(&module.name, "disabled");
    }
    if !admits(&module.flavors, &ctx.config.flavors) {
        let note = format!("requires flavor {}", module.flavors.join(", "));
        ctx.log.info(&note);
        return ModuleReport::skipped(&module.name, note);
    }
    if module.symlinks.is_empty() {
        ctx.log.info("module contains no files");
        return ModuleReport::skipped(&module.name, "module contains no files");
    }

    let names: Vec<&str> = module
        .symlinks
        .iter()
        .map(|e| e.name().unwrap_or("?"))
        .collect();
    ctx.log.info(&format!("files: {}", names.join(", ")));
    if !ctx.prompter.confirm(CONFIRM_MODULE) {
        return ModuleReport::skipped(&module.name, "declined");
    }

    let mut location = module.location.clone();
    let mut asked_base = false;
    let mut descriptors = Vec::with_capacity(module.symlinks.len());
    let mut stats = OutcomeStats::default();

    for entry in &module.symlinks {
        let name = entry.name().unwrap_or("<malformed>");
        let report = if ctx.is_cancelled() {
            DescriptorReport::early(
                name,
                InstallOutcome::Skipped {
                    reason: "interrupted".to_string(),
                },
            )
        } else {
            let normalized = normalize(
                entry,
                &module.source_path,
                location.as_ref(),
                &ctx.config.flavors,
            );
            match ready(name, normalized) {
                Err(report) => report,
                Ok(mut desc) => {
                    if ctx.config.cache_module_location && !asked_base && desc.inherits_prompt() {
                        asked_base = true;
                        if let PromptAnswer::Path(path) = ctx.prompter.module_base_path(&module.name)
                        {
                            let base = Location::Fixed(path);
                            desc.base = base.clone();
                            location = Some(base);
                        }
                    }
                    install_normalized(ctx, &desc)
                }
            }
        };
        log_report(ctx, &report);
        stats.record(&report.outcome);
        descriptors.push(report);
    }

    let status = if stats.failed > 0 {
        ModuleStatus::Failed
    } else if ctx.dry_run() {
        ModuleStatus::DryRun
    } else {
        ModuleStatus::Ok
    };
    ModuleReport {
        name: module.name.clone(),
        status,
        note: None,
        descriptors,
        stats,
    }
}

/// Log one descriptor outcome with its install and target paths.
fn log_report(ctx: &Context, report: &DescriptorReport) {
    let (level, kind) = match &report.outcome {
        InstallOutcome::Error(err) => (EventLevel::Error, Some(err.kind().to_string())),
        InstallOutcome::AlreadyLinked | InstallOutcome::Skipped { .. } => {
            (EventLevel::Debug, None)
        }
        InstallOutcome::Installed { .. } | InstallOutcome::BackupDeduped { .. } => {
            (EventLevel::Info, None)
        }
    };
    ctx.log.descriptor(&DescriptorEvent {
        level,
        name: report.name.clone(),
        outcome: report.outcome.to_string(),
        kind,
        install: report.install.as_ref().map(|p| p.display().to_string()),
        target: report.target.as_ref().map(|p| p.display().to_string()),
    });
}
