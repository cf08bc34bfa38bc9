//! Custom report cleanup. Reports have no dependents; every one listed is
//! deleted.

use tracing::info;

use crate::api::helpers::api_delete;
use crate::api::types::ReportList;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner, fetch_listing};
use crate::graph::types::ResourceGraph;

pub struct CustomReportCleaner;

impl Cleaner for CustomReportCleaner {
    fn name(&self) -> &'static str {
        "report"
    }

    fn delete(
        &self,
        _graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        let listing: ReportList = fetch_listing(ctx.client, &ctx.api.reports(), "reports")?;
        info!(
            event = "core.report.clean_started",
            total = listing.qualifier.len()
        );
        let mut stats = CleanStats::default();

        for report in &listing.qualifier {
            if api_delete(
                ctx.client,
                &ctx.api.report(&report.name),
                &format!("report {}", report.name),
            ) {
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.report.clean_completed",
            deleted = stats.deleted,
            retained = stats.retained
        );
        Ok(stats)
    }
}
