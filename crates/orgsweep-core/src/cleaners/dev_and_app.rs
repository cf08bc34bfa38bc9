//! Developer and app cleanup.
//!
//! Apps with no remaining product bindings are deleted first; a developer
//! whose last app went away in the same pass is deleted immediately after.

use tracing::info;

use crate::api::helpers::api_delete;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner};
use crate::graph::operations::ResourceKind;
use crate::graph::types::ResourceGraph;

pub struct DevAndAppCleaner;

impl Cleaner for DevAndAppCleaner {
    fn name(&self) -> &'static str {
        "developer"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        info!(
            event = "core.developer.clean_started",
            developers = graph.developers.len(),
            apps = graph.apps.len()
        );
        let mut stats = CleanStats::default();

        let emails: Vec<String> = graph.developers.iter().map(|d| d.email.clone()).collect();
        for email in emails {
            let app_names: Vec<String> = graph
                .developers
                .iter()
                .find(|d| d.email == email)
                .map(|d| d.apps.clone())
                .unwrap_or_default();

            for app_name in app_names {
                let has_products = graph
                    .apps
                    .iter()
                    .find(|a| a.name == app_name && a.developer == email)
                    .map(|a| !a.api_products.is_empty())
                    .unwrap_or(false);
                if has_products {
                    info!(
                        event = "core.developer.live_product_skip",
                        developer = %email,
                        app = %app_name
                    );
                    stats.skipped += 1;
                    continue;
                }

                if api_delete(
                    ctx.client,
                    &ctx.api.developer_app(&email, &app_name),
                    &format!("app {app_name}"),
                ) {
                    graph.prune_reference(ResourceKind::App, &app_name);
                    graph.remove_app(&app_name);
                    stats.deleted += 1;
                } else {
                    stats.retained += 1;
                }
            }

            // The eligibility check runs after the app loop so a developer
            // whose last app was just deleted goes in the same pass.
            let has_apps = graph
                .developers
                .iter()
                .find(|d| d.email == email)
                .map(|d| !d.apps.is_empty())
                .unwrap_or(true);
            if has_apps {
                info!(event = "core.developer.live_app_skip", developer = %email);
                stats.skipped += 1;
                continue;
            }

            if api_delete(
                ctx.client,
                &ctx.api.developer(&email),
                &format!("developer {email}"),
            ) {
                graph.remove_developer(&email);
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.developer.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}
