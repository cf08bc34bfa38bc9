//! Environment group cleanup. A group goes only once its live attachment
//! list is empty.

use tracing::info;

use crate::api::helpers::api_delete;
use crate::api::types::{EnvGroupAttachmentList, EnvGroupList};
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner, fetch_listing};
use crate::graph::types::ResourceGraph;

pub struct EnvGroupCleaner;

impl Cleaner for EnvGroupCleaner {
    fn name(&self) -> &'static str {
        "envgroup"
    }

    fn delete(
        &self,
        _graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        let listing: EnvGroupList =
            fetch_listing(ctx.client, &ctx.api.env_groups(), "envgroups")?;
        info!(
            event = "core.envgroup.clean_started",
            total = listing.environment_groups.len()
        );
        let mut stats = CleanStats::default();

        for group in &listing.environment_groups {
            let attachments: EnvGroupAttachmentList = fetch_listing(
                ctx.client,
                &ctx.api.env_group_attachments(&group.name),
                "envgroup attachments",
            )?;
            if !attachments.attachments.is_empty() {
                info!(
                    event = "core.envgroup.attached_skip",
                    group = %group.name,
                    attachments = attachments.attachments.len()
                );
                stats.skipped += 1;
                continue;
            }

            if api_delete(
                ctx.client,
                &ctx.api.env_group(&group.name),
                &format!("envgroup {}", group.name),
            ) {
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.envgroup.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeClient;
    use crate::api::urls::OrgApi;
    use crate::api::waiter;

    fn ctx<'a>(client: &'a FakeClient, api: &'a OrgApi) -> CleanContext<'a> {
        CleanContext {
            client,
            api,
            undeploy_wait: waiter::immediate_policy(),
            attachment_wait: waiter::immediate_policy(),
        }
    }

    #[test]
    fn test_deletes_only_detached_groups() {
        let client = FakeClient::new()
            .on_get(
                "/envgroups?",
                200,
                br#"{"environmentGroups": [{"name": "public"}, {"name": "internal"}]}"#,
            )
            .on_get(
                "/envgroups/public/attachments",
                200,
                br#"{"environmentGroupAttachments": [{"environment": "prod"}]}"#,
            )
            .on_get("/envgroups/internal/attachments", 200, b"{}");
        let api = OrgApi::new("x", "o");
        let mut graph = ResourceGraph::default();

        let stats = EnvGroupCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(client.deletes_ending_with("/envgroups/internal"), 1);
        assert_eq!(client.deletes_containing("/envgroups/public"), 0);
    }

    #[test]
    fn test_unavailable_group_listing_aborts_the_pass() {
        let client = FakeClient::new().on_get("/envgroups?", 502, b"");
        let api = OrgApi::new("x", "o");
        let mut graph = ResourceGraph::default();

        let error = EnvGroupCleaner
            .delete(&mut graph, &ctx(&client, &api))
            .unwrap_err();

        assert!(matches!(
            error,
            CleanError::ListingFailed {
                resource: "envgroups",
                status: 502
            }
        ));
    }

    #[test]
    fn test_unavailable_attachment_listing_aborts_the_pass() {
        // Without the attachment list there is no safe delete decision.
        let client = FakeClient::new()
            .on_get(
                "/envgroups?",
                200,
                br#"{"environmentGroups": [{"name": "public"}]}"#,
            )
            .on_get("/envgroups/public/attachments", 500, b"");
        let api = OrgApi::new("x", "o");
        let mut graph = ResourceGraph::default();

        let error = EnvGroupCleaner
            .delete(&mut graph, &ctx(&client, &api))
            .unwrap_err();

        assert!(matches!(error, CleanError::ListingFailed { .. }));
        assert_eq!(client.deletes_containing("/envgroups/"), 0);
    }
}
