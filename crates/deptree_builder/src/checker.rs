use anyhow::{Result, anyhow};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::thread;

use crate::{
    builder::GraphBuilder,
    config::Config,
    types::{CheckResult, EntryResult},
};

/// Builds one dependency graph per configured entry.
///
/// Entries are built in parallel, each into its own graph. They share one
/// [`BuildSession`](crate::BuildSession), so parse and resolve caches live
/// exactly as long as this run. Results come back in the order the entries
/// were given.
pub fn run_dependency_build(mut cfg: Config) -> Result<CheckResult> {
    info!("Starting dependency build");

    cfg.initialize()?;
    if cfg.entries.is_empty() {
        return Err(anyhow!("No entry files given"));
    }

    let options = cfg.build_options();
    debug!(
        "Resolving with extensions {:?} (dynamic imports: {}, policy: {:?})",
        options.extensions, options.dynamic_imports, options.error_policy
    );
    let session = GraphBuilder::new(&options).session();

    info!("Processing {} entry files in parallel", cfg.entries.len());

    let entries: Vec<EntryResult> = cfg
        .entries
        .par_iter()
        .map(|entry| {
            let thread_id = thread::current().id();
            debug!("Thread {:?} processing: {}", thread_id, entry.display());

            let outcome = session.build(entry);
            match &outcome {
                Ok(o) => trace!(
                    "Entry {} has {} files and {} cycles",
                    entry.display(),
                    o.graph.node_count(),
                    o.cycles.len()
                ),
                Err(e) => warn!("Error building graph for {}: {}", entry.display(), e),
            }
            EntryResult { entry: entry.clone(), outcome }
        })
        .collect();

    let result = CheckResult { entries, files_analyzed: session.files_parsed() };
    info!(
        "Dependency build complete. {} files analyzed, {} cycles",
        result.files_analyzed,
        result.cycle_count()
    );
    Ok(result)
}
