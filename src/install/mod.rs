//! The symlink installation engine.
//!
//! For every module: filter and confirm ([`runner`]), then for every
//! descriptor normalize ([`normalize`]), resolve the install path
//! ([`resolve`]) and run the installer state machine ([`installer`]).
mod context;
pub mod installer;
mod locks;
pub mod normalize;
mod parallel;
pub mod resolve;
pub mod runner;
mod stats;

use std::sync::Arc;

pub use context::Context;
pub use installer::{DescriptorReport, InstallOutcome};
pub use locks::PathLocks;
pub use runner::ModuleReport;
pub use stats::OutcomeStats;

use crate::config::discovery::Discovered;
use crate::logging::Logger;

/// Aggregate result of one run: every module's report in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Per-module reports.
    pub modules: Vec<ModuleReport>,
}

impl RunReport {
    /// Outcome counts summed over every module.
    #[must_use]
    pub fn totals(&self) -> OutcomeStats {
        let mut total = OutcomeStats::default();
        for module in &self.modules {
            total += module.stats;
        }
        total
    }

    /// Every descriptor report, module by module.
    pub fn descriptors(&self) -> impl Iterator<Item = &DescriptorReport> {
        self.modules.iter().flat_map(|m| m.descriptors.iter())
    }

    /// Find a module's report by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&ModuleReport> {
        self.modules.iter().find(|m| m.name == name)
    }
}

/// Install every discovered module and record each one for the summary.
///
/// Modules whose config could not be loaded are reported as failed without
/// running. The rest run sequentially, or on the rayon pool when the run is
/// both parallel and non-interactive. Module results are recorded on
/// `logger` in discovery order either way.
pub fn run_all(ctx: &Context, logger: &Arc<Logger>, discovered: &[Discovered]) -> RunReport {
    let runnable: Vec<_> = discovered
        .iter()
        .filter_map(|d| match d {
            Discovered::Module(record) => Some(record),
            Discovered::Invalid { .. } => None,
        })
        .collect();

    let ran: Vec<ModuleReport> = if ctx.config.runs_parallel() {
        parallel::run_modules_parallel(ctx, logger, &runnable)
    } else {
        runnable
            .iter()
            .map(|module| runner::run_module(ctx, module))
            .collect()
    };
    let mut ran = ran.into_iter();

    let modules = discovered
        .iter()
        .filter_map(|d| match d {
            Discovered::Module(_) => ran.next(),
            Discovered::Invalid { name, error } => {
                ctx.log.stage(name);
                ctx.log.error(&error.to_string());
                Some(ModuleReport::failed(name, error.to_string()))
            }
        })
        .collect::<Vec<_>>();

    for module in &modules {
        ctx.log.record_module(
            &module.name,
            module.status,
            Some(&module.message(ctx.dry_run())),
        );
    }
    RunReport { modules }
}
