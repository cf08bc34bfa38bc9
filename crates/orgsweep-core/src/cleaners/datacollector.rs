//! Data collector cleanup: bundle-scan surviving revisions for capture
//! references, then delete the collectors nothing writes to.

use tracing::info;

use crate::api::helpers::api_delete;
use crate::api::types::DataCollectorList;
use crate::bundle::analyzer::scan_surviving_revisions;
use crate::bundle::parsers::UsagePolicy;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner, fetch_listing};
use crate::graph::types::ResourceGraph;

pub struct DataCollectorCleaner;

impl Cleaner for DataCollectorCleaner {
    fn name(&self) -> &'static str {
        "datacollector"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        let listing: DataCollectorList =
            fetch_listing(ctx.client, &ctx.api.data_collectors(), "datacollectors")?;
        info!(
            event = "core.datacollector.clean_started",
            total = listing.data_collectors.len()
        );
        let mut stats = CleanStats::default();

        // The bundle scan is the expensive part; with nothing listed there
        // is nothing to decide.
        if listing.data_collectors.is_empty() {
            info!(event = "core.datacollector.clean_completed", deleted = 0usize);
            return Ok(stats);
        }

        let used = scan_surviving_revisions(
            ctx.client,
            ctx.api,
            graph,
            UsagePolicy::DataCollectorUsage,
        );

        for collector in &listing.data_collectors {
            if used.contains(&collector.name) {
                info!(
                    event = "core.datacollector.in_use_skip",
                    collector = %collector.name
                );
                stats.skipped += 1;
                continue;
            }
            if api_delete(
                ctx.client,
                &ctx.api.data_collector(&collector.name),
                &format!("datacollector {}", collector.name),
            ) {
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.datacollector.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}
