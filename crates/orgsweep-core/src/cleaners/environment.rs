//! Environment cleanup: detach from runtime instances, then delete.

use tracing::{info, warn};

use crate::api::helpers::api_delete;
use crate::api::types::{AttachmentList, InstanceList, OperationRef};
use crate::api::waiter::wait_for_operation;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner};
use crate::graph::types::ResourceGraph;

pub struct EnvironmentCleaner;

/// Detach `env` from every runtime instance it is attached to, waiting for
/// each detach operation to complete. Listing or detach failures are logged
/// and skipped; the environment delete is attempted regardless and the
/// server rejects it if an attachment really remains.
fn detach_from_instances(ctx: &CleanContext, env: &str) {
    let instances = match ctx.client.get(&ctx.api.instances()) {
        Ok(resp) if resp.is_success() => resp.json::<InstanceList>().unwrap_or_default(),
        Ok(resp) => {
            warn!(
                event = "core.environment.instance_listing_failed",
                environment = env,
                status = resp.status
            );
            return;
        }
        Err(e) => {
            warn!(
                event = "core.environment.instance_listing_failed",
                environment = env,
                error = %e
            );
            return;
        }
    };

    for instance in &instances.instances {
        let attachments = match ctx.client.get(&ctx.api.instance_attachments(&instance.name)) {
            Ok(resp) if resp.is_success() => resp.json::<AttachmentList>().unwrap_or_default(),
            Ok(resp) => {
                warn!(
                    event = "core.environment.attachment_listing_failed",
                    environment = env,
                    instance = %instance.name,
                    status = resp.status
                );
                continue;
            }
            Err(e) => {
                warn!(
                    event = "core.environment.attachment_listing_failed",
                    environment = env,
                    instance = %instance.name,
                    error = %e
                );
                continue;
            }
        };

        for attachment in attachments.attachments.iter().filter(|a| a.environment == env) {
            info!(
                event = "core.environment.detach_started",
                environment = env,
                instance = %instance.name,
                attachment = %attachment.name
            );
            let url = ctx.api.instance_attachment(&instance.name, &attachment.name);
            let operation = match ctx.client.delete(&url) {
                Ok(resp) if resp.is_success() => {
                    resp.json::<OperationRef>().unwrap_or_default().name
                }
                Ok(resp) => {
                    warn!(
                        event = "core.environment.detach_failed",
                        environment = env,
                        instance = %instance.name,
                        status = resp.status
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        event = "core.environment.detach_failed",
                        environment = env,
                        instance = %instance.name,
                        error = %e
                    );
                    continue;
                }
            };

            if let Some(operation) = operation {
                wait_for_operation(
                    ctx.client,
                    &ctx.api.operation(&operation),
                    ctx.attachment_wait,
                    &format!("detach {env} from {}", instance.name),
                );
            }
        }
    }
}

impl Cleaner for EnvironmentCleaner {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        info!(
            event = "core.environment.clean_started",
            total = graph.environments.len()
        );
        let mut stats = CleanStats::default();

        let names: Vec<String> = graph.environments.iter().map(|e| e.name.clone()).collect();
        for name in names {
            let empty = graph
                .environments
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.is_empty())
                .unwrap_or(false);
            if !empty {
                info!(
                    event = "core.environment.occupied_skip",
                    environment = %name,
                    message = "Environment still hosts proxies or shared flows"
                );
                stats.skipped += 1;
                continue;
            }

            detach_from_instances(ctx, &name);

            if api_delete(
                ctx.client,
                &ctx.api.environment(&name),
                &format!("environment {name}"),
            ) {
                graph.remove_environment(&name);
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.environment.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}
