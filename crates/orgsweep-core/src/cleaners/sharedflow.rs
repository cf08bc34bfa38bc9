//! Shared-flow cleanup: flow-hook handling, undeploy, prune, delete.

use tracing::{info, warn};

use crate::api::helpers::api_delete;
use crate::api::urls::DeployableKind;
use crate::api::waiter::wait_for_undeploy;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner};
use crate::graph::operations::ResourceKind;
use crate::graph::types::{ResourceGraph, revision_id};

pub struct SharedflowCleaner;

/// Where a shared flow is bound to flow hooks, split by whether the hosting
/// environment blocks deletion.
struct HookAttachments {
    /// Attached in an environment that hosts live proxies: the shared flow
    /// is load-bearing there and must not be deleted.
    blocked: bool,
    /// Environments without proxies where the hook can be detached first.
    detachable_envs: Vec<String>,
}

fn hook_attachments(graph: &ResourceGraph, sharedflow: &str) -> HookAttachments {
    let mut blocked = false;
    let mut detachable_envs = Vec::new();

    for env in &graph.environments {
        let attached = env.flowhooks.iter().any(|h| h.sharedflow == sharedflow);
        if !attached {
            continue;
        }
        if env.hosts_proxies() {
            blocked = true;
        } else if !detachable_envs.contains(&env.name) {
            detachable_envs.push(env.name.clone());
        }
    }

    HookAttachments {
        blocked,
        detachable_envs,
    }
}

fn detach_flowhooks(graph: &mut ResourceGraph, ctx: &CleanContext, env_name: &str, sharedflow: &str) {
    info!(
        event = "core.sharedflow.flowhook_detach_started",
        sharedflow = sharedflow,
        environment = env_name
    );

    let Some(env) = graph.environments.iter_mut().find(|e| e.name == env_name) else {
        return;
    };

    for hook in env.flowhooks.iter_mut() {
        if hook.sharedflow == sharedflow {
            let url = ctx.api.flowhook(env_name, &hook.name);
            if let Err(e) = ctx.client.delete(&url) {
                warn!(
                    event = "core.sharedflow.flowhook_detach_failed",
                    sharedflow = sharedflow,
                    environment = env_name,
                    hook = %hook.name,
                    error = %e
                );
            }
            hook.sharedflow.clear();
        }
    }
}

impl Cleaner for SharedflowCleaner {
    fn name(&self) -> &'static str {
        "sharedflow"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        info!(
            event = "core.sharedflow.clean_started",
            total = graph.sharedflows.len()
        );
        let mut stats = CleanStats::default();

        let names: Vec<String> = graph.sharedflows.iter().map(|s| s.name.clone()).collect();
        for name in names {
            let has_proxy_refs = graph
                .sharedflows
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.has_proxy_references())
                .unwrap_or(false);
            if has_proxy_refs {
                info!(
                    event = "core.sharedflow.live_proxy_skip",
                    sharedflow = %name,
                    message = "Shared flow is used by existing proxies"
                );
                stats.skipped += 1;
                continue;
            }

            let attachments = hook_attachments(graph, &name);
            for env_name in &attachments.detachable_envs {
                detach_flowhooks(graph, ctx, env_name, &name);
            }
            if attachments.blocked {
                info!(
                    event = "core.sharedflow.live_flowhook_skip",
                    sharedflow = %name,
                    message = "Shared flow is bound to a flow hook in a live environment"
                );
                stats.skipped += 1;
                continue;
            }

            let deployments: Vec<(String, String)> = graph
                .sharedflows
                .iter()
                .find(|s| s.name == name)
                .map(|s| {
                    s.revisions
                        .iter()
                        .filter_map(|(key, detail)| {
                            detail
                                .environment
                                .clone()
                                .map(|env| (revision_id(key).to_string(), env))
                        })
                        .collect()
                })
                .unwrap_or_default();

            for (revision, env) in deployments {
                info!(
                    event = "core.sharedflow.undeploy_started",
                    sharedflow = %name,
                    revision = %revision,
                    environment = %env
                );
                let url = ctx
                    .api
                    .deployments(DeployableKind::SharedFlow, &env, &name, &revision);
                if let Err(e) = ctx.client.delete(&url) {
                    warn!(
                        event = "core.sharedflow.undeploy_request_failed",
                        sharedflow = %name,
                        revision = %revision,
                        error = %e
                    );
                }
                wait_for_undeploy(ctx.client, &url, ctx.undeploy_wait, &name);
            }

            graph.prune_reference(ResourceKind::SharedFlow, &name);

            if api_delete(
                ctx.client,
                &ctx.api.sharedflow(&name),
                &format!("sharedflow {name}"),
            ) {
                graph.remove_sharedflow(&name);
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.sharedflow.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}
