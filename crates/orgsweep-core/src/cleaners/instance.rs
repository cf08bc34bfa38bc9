//! Runtime instance cleanup. Runs last: an instance goes only once every
//! environment attachment on it is gone.

use tracing::info;

use crate::api::helpers::api_delete;
use crate::api::types::{AttachmentList, InstanceList};
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner, fetch_listing};
use crate::graph::types::ResourceGraph;

pub struct InstanceCleaner;

impl Cleaner for InstanceCleaner {
    fn name(&self) -> &'static str {
        "instance"
    }

    fn delete(
        &self,
        _graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        let listing: InstanceList = fetch_listing(ctx.client, &ctx.api.instances(), "instances")?;
        info!(
            event = "core.instance.clean_started",
            total = listing.instances.len()
        );
        let mut stats = CleanStats::default();

        for instance in &listing.instances {
            let attachments: AttachmentList = fetch_listing(
                ctx.client,
                &ctx.api.instance_attachments(&instance.name),
                "instance attachments",
            )?;
            if !attachments.attachments.is_empty() {
                info!(
                    event = "core.instance.attached_skip",
                    instance = %instance.name,
                    attachments = attachments.attachments.len()
                );
                stats.skipped += 1;
                continue;
            }

            if api_delete(
                ctx.client,
                &ctx.api.instance(&instance.name),
                &format!("instance {}", instance.name),
            ) {
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.instance.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}
