//! Ordered execution of the cleaner list.
//!
//! The order is load-bearing: proxies first so their references are pruned
//! before products and shared flows are judged, usage scans after the
//! deletions that could free their subjects, environments only once they
//! could have emptied out, instances last.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use crate::cleaners::{
    ApiProductCleaner, CleanContext, CleanStats, Cleaner, CustomReportCleaner,
    DataCollectorCleaner, DevAndAppCleaner, EnvGroupCleaner, EnvironmentCleaner, InstanceCleaner,
    KvmCleaner, ProxyCleaner, SharedflowCleaner,
};
use crate::graph::persistence::save_snapshot;
use crate::graph::types::ResourceGraph;

/// What one cleaner pass produced, or why it could not run.
#[derive(Debug, Clone, Serialize)]
pub struct CleanerOutcome {
    pub name: &'static str,

    #[serde(flatten)]
    pub stats: CleanStats,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate result of a full cleanup run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub cleaners: Vec<CleanerOutcome>,
    pub totals: CleanStats,
    pub duration_ms: i64,
    /// Where the post-run graph was written (the dry-run preview path when
    /// the deletes were suppressed).
    pub snapshot_path: String,
    pub snapshot_saved: bool,
}

impl RunSummary {
    /// True when every pass ran and no delete attempt failed.
    pub fn is_clean(&self) -> bool {
        self.totals.retained == 0 && self.cleaners.iter().all(|c| c.error.is_none())
    }
}

fn cleaner_list(protected: BTreeSet<String>) -> Vec<Box<dyn Cleaner>> {
    vec![
        Box::new(ProxyCleaner::new(protected)),
        Box::new(SharedflowCleaner),
        Box::new(ApiProductCleaner),
        Box::new(DevAndAppCleaner),
        Box::new(KvmCleaner),
        Box::new(EnvironmentCleaner),
        Box::new(CustomReportCleaner),
        Box::new(DataCollectorCleaner),
        Box::new(EnvGroupCleaner),
        Box::new(InstanceCleaner),
    ]
}

/// Run every cleaner once in dependency order, then persist the final graph
/// to `output`.
///
/// A cleaner failure (an unavailable live listing) aborts only that pass;
/// the remaining cleaners still run, and the snapshot is written regardless
/// so the next run resumes from whatever this one achieved.
///
/// With `dry_run` set the deletes were suppressed at the client, so the
/// swept graph describes a run that never happened. It is written to a
/// `*.dryrun.json` preview beside `output` and the real snapshot is left
/// untouched; persisted state only ever records confirmed remote deletes.
pub fn run_cleanup(
    graph: &mut ResourceGraph,
    ctx: &CleanContext,
    protected: BTreeSet<String>,
    output: &Path,
    dry_run: bool,
) -> RunSummary {
    let started = chrono::Utc::now();
    info!(event = "core.runner.run_started", dry_run = dry_run);

    let mut cleaners = Vec::new();
    let mut totals = CleanStats::default();

    for cleaner in cleaner_list(protected) {
        let name = cleaner.name();
        info!(event = "core.runner.cleaner_started", cleaner = name);

        match cleaner.delete(graph, ctx) {
            Ok(stats) => {
                totals.merge(stats);
                cleaners.push(CleanerOutcome {
                    name,
                    stats,
                    error: None,
                });
            }
            Err(e) => {
                error!(
                    event = "core.runner.cleaner_failed",
                    cleaner = name,
                    error = %e
                );
                cleaners.push(CleanerOutcome {
                    name,
                    stats: CleanStats::default(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let snapshot_path = if dry_run {
        let preview = output.with_extension("dryrun.json");
        info!(
            event = "core.runner.dry_run_preview",
            path = %preview.display()
        );
        preview
    } else {
        output.to_path_buf()
    };

    let snapshot_saved = match save_snapshot(graph, &snapshot_path) {
        Ok(()) => true,
        Err(e) => {
            error!(
                event = "core.runner.snapshot_save_failed",
                path = %snapshot_path.display(),
                error = %e
            );
            false
        }
    };

    let duration_ms = (chrono::Utc::now() - started).num_milliseconds();
    info!(
        event = "core.runner.run_completed",
        deleted = totals.deleted,
        skipped = totals.skipped,
        retained = totals.retained,
        duration_ms = duration_ms,
        snapshot_saved = snapshot_saved
    );

    RunSummary {
        cleaners,
        totals,
        duration_ms,
        snapshot_path: snapshot_path.display().to_string(),
        snapshot_saved,
    }
}
