//! Proxy cleanup: undeploy every revision, prune references, delete.
//!
//! Runs first. Every later pass assumes that after this one, the only proxy
//! references left in the graph point at proxies that really survived.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::api::helpers::api_delete;
use crate::api::urls::DeployableKind;
use crate::api::waiter::wait_for_undeploy;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner};
use crate::graph::operations::ResourceKind;
use crate::graph::types::{ResourceGraph, revision_id};

pub struct ProxyCleaner {
    protected: BTreeSet<String>,
}

impl ProxyCleaner {
    /// `protected` names are never deleted regardless of eligibility.
    pub fn new(protected: BTreeSet<String>) -> Self {
        Self { protected }
    }

    fn is_protected(&self, name: &str) -> bool {
        self.protected.contains(name)
    }
}

impl Cleaner for ProxyCleaner {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        info!(event = "core.proxy.clean_started", total = graph.proxies.len());
        let mut stats = CleanStats::default();

        let names: Vec<String> = graph.proxies.iter().map(|p| p.name.clone()).collect();
        for name in names {
            if self.is_protected(&name) {
                info!(event = "core.proxy.protected_skip", proxy = %name);
                stats.skipped += 1;
                continue;
            }

            // Undeploy every active revision/environment pair. A wait
            // timeout is non-fatal; the delete is attempted regardless.
            let deployments: Vec<(String, String)> = graph
                .proxies
                .iter()
                .find(|p| p.name == name)
                .map(|p| {
                    p.revisions
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
                    event = "core.proxy.undeploy_started",
                    proxy = %name,
                    revision = %revision,
                    environment = %env
                );
                let url = ctx.api.deployments(DeployableKind::Proxy, &env, &name, &revision);
                if let Err(e) = ctx.client.delete(&url) {
                    warn!(
                        event = "core.proxy.undeploy_request_failed",
                        proxy = %name,
                        revision = %revision,
                        error = %e
                    );
                }
                wait_for_undeploy(ctx.client, &url, ctx.undeploy_wait, &name);
            }

            graph.prune_reference(ResourceKind::Proxy, &name);

            if api_delete(ctx.client, &ctx.api.proxy(&name), &format!("proxy {name}")) {
                graph.remove_proxy(&name);
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.proxy.clean_completed",
            deleted = stats.deleted,
            skipped = stats.skipped,
            retained = stats.retained
        );
        Ok(stats)
    }
}
