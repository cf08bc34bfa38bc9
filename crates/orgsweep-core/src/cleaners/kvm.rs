//! Key/value map cleanup: bundle-scan surviving revisions for usage, then
//! delete the maps nothing references.

use std::collections::BTreeSet;

use tracing::info;

use crate::api::helpers::api_delete;
use crate::bundle::analyzer::scan_surviving_revisions;
use crate::bundle::parsers::UsagePolicy;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner};
use crate::graph::types::ResourceGraph;

pub struct KvmCleaner;

impl Cleaner for KvmCleaner {
    fn name(&self) -> &'static str {
        "kvm"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        let env_kvm_count: usize = graph.environments.iter().map(|e| e.kvms.len()).sum();
        info!(
            event = "core.kvm.clean_started",
            organization_kvms = graph.organization_kvms.len(),
            environment_kvms = env_kvm_count
        );
        let mut stats = CleanStats::default();

        // Usage is read from the bundles of everything that survived the
        // earlier passes, so a map only becomes deletable once its last
        // referencing proxy is gone.
        let used: BTreeSet<String> =
            scan_surviving_revisions(ctx.client, ctx.api, graph, UsagePolicy::KvmUsage);

        let org_kvms = graph.organization_kvms.clone();
        for name in org_kvms {
            if used.contains(&name) {
                info!(event = "core.kvm.in_use_skip", kvm = %name, scope = "organization");
                stats.skipped += 1;
                continue;
            }
            if api_delete(ctx.client, &ctx.api.org_kvm(&name), &format!("kvm {name}")) {
                graph.organization_kvms.retain(|k| k != &name);
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        let env_kvms: Vec<(String, String)> = graph
            .environments
            .iter()
            .flat_map(|e| e.kvms.iter().map(|k| (e.name.clone(), k.clone())))
            .collect();
        for (env, name) in env_kvms {
            if used.contains(&name) {
                info!(event = "core.kvm.in_use_skip", kvm = %name, scope = %env);
                stats.skipped += 1;
                continue;
            }
            if api_delete(
                ctx.client,
                &ctx.api.env_kvm(&env, &name),
                &format!("kvm {name}"),
            ) {
                if let Some(environment) = graph.environments.iter_mut().find(|e| e.name == env) {
                    environment.kvms.retain(|k| k != &name);
                }
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.kvm.clean_completed",
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
    use crate::bundle::analyzer::test_bundles::zip_bundle;
    use crate::graph::types::{Environment, Proxy, RevisionDeployment};

    fn ctx<'a>(client: &'a FakeClient, api: &'a OrgApi) -> CleanContext<'a> {
        CleanContext {
            client,
            api,
            undeploy_wait: waiter::immediate_policy(),
            attachment_wait: waiter::immediate_policy(),
        }
    }

    #[test]
    fn test_deletes_unreferenced_maps_in_both_scopes() {
        let client = FakeClient::new();
        let api = OrgApi::new("x", "o");
        let mut graph = ResourceGraph {
            organization_kvms: vec!["org-map".to_string()],
            environments: vec![Environment {
                name: "dev".to_string(),
                kvms: vec!["env-map".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };

        let stats = KvmCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.deleted, 2);
        assert!(graph.organization_kvms.is_empty());
        assert!(graph.environments[0].kvms.is_empty());
        assert_eq!(client.deletes_ending_with("/keyvaluemaps/org-map"), 1);
        assert_eq!(
            client.deletes_containing("environments/dev/keyvaluemaps/env-map"),
            1
        );
    }

    #[test]
    fn test_map_referenced_by_surviving_proxy_is_retained() {
        // Proxy p1 survived earlier passes and its bundle uses "org-map":
        // the map must not be touched while p1 exists.
        let bundle = zip_bundle(&[(
            "apiproxy/policies/KV.xml",
            r#"<KeyValueMapOperations mapIdentifier="org-map"/>"#,
        )]);
        let client = FakeClient::new().on_get("format=bundle", 200, &bundle);
        let api = OrgApi::new("x", "o");

        let mut proxy = Proxy {
            name: "p1".to_string(),
            ..Default::default()
        };
        proxy
            .revisions
            .insert("1".to_string(), RevisionDeployment::default());

        let mut graph = ResourceGraph {
            proxies: vec![proxy],
            organization_kvms: vec!["org-map".to_string(), "idle-map".to_string()],
            ..Default::default()
        };

        let stats = KvmCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.deleted, 1);
        assert_eq!(graph.organization_kvms, vec!["org-map"]);
        assert_eq!(client.deletes_containing("keyvaluemaps/org-map"), 0);
        assert_eq!(client.deletes_containing("keyvaluemaps/idle-map"), 1);
    }

    #[test]
    fn test_map_becomes_deletable_once_referencing_proxy_is_gone() {
        // Same graph, same scripted bundle, two passes: while p1 survives
        // its bundle pins "org-map"; the pass after p1 is removed deletes
        // the very same map.
        let bundle = zip_bundle(&[(
            "apiproxy/policies/KV.xml",
            r#"<KeyValueMapOperations mapIdentifier="org-map"/>"#,
        )]);
        let client = FakeClient::new().on_get("format=bundle", 200, &bundle);
        let api = OrgApi::new("x", "o");

        let mut proxy = Proxy {
            name: "p1".to_string(),
            ..Default::default()
        };
        proxy
            .revisions
            .insert("1".to_string(), RevisionDeployment::default());

        let mut graph = ResourceGraph {
            proxies: vec![proxy],
            organization_kvms: vec!["org-map".to_string()],
            ..Default::default()
        };

        let before = KvmCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();
        assert_eq!(before.skipped, 1);
        assert_eq!(before.deleted, 0);
        assert_eq!(graph.organization_kvms, vec!["org-map"]);
        assert_eq!(client.deletes_containing("keyvaluemaps/org-map"), 0);

        graph.remove_proxy("p1");

        let after = KvmCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();
        assert_eq!(after.deleted, 1);
        assert!(graph.organization_kvms.is_empty());
        assert_eq!(client.deletes_containing("keyvaluemaps/org-map"), 1);
    }

    #[test]
    fn test_failed_delete_keeps_map_in_graph() {
        let client = FakeClient::new().on_delete("keyvaluemaps/org-map", 500, b"");
        let api = OrgApi::new("x", "o");
        let mut graph = ResourceGraph {
            organization_kvms: vec!["org-map".to_string()],
            ..Default::default()
        };

        let stats = KvmCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.retained, 1);
        assert_eq!(graph.organization_kvms, vec!["org-map"]);
    }
}
