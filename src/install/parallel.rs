//! Rayon-based parallel module execution.
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::ModuleRecord;
use crate::logging::{BufferedLog, Log, Logger};

use super::context::Context;
use super::runner::{ModuleReport, run_module};

/// Run `modules` concurrently on the rayon pool.
///
/// Each module logs into its own [`BufferedLog`]; the buffers are replayed in
/// input order once every module has finished, so console and log-file
/// output read exactly like a sequential run. Reports come back in input
/// order too. Per-path locks in the context keep modules that share an
/// install path from racing on it.
pub fn run_modules_parallel(
    ctx: &Context,
    logger: &Arc<Logger>,
    modules: &[&ModuleRecord],
) -> Vec<ModuleReport> {
    let results: Vec<(ModuleReport, Arc<BufferedLog>)> = modules
        .par_iter()
        .map(|module| {
            let buf = Arc::new(BufferedLog::new(Arc::clone(logger)));
            let module_ctx = ctx.with_log(Arc::clone(&buf) as Arc<dyn Log>);
            (run_module(&module_ctx, module), buf)
        })
        .collect();

    results
        .into_iter()
        .map(|(report, buf)| {
            buf.flush();
            report
        })
        .collect()
}
