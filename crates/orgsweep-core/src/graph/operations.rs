//! Graph mutation primitives shared by the cleaners.
//!
//! All operations are synchronous and in-process. Deleting a resource
//! remotely and forgetting to prune its references here would leave later
//! cleaners reasoning about a stale world, so every remove has a matching
//! prune.

use tracing::debug;

use crate::graph::types::ResourceGraph;

/// Resource kinds that other entities may hold references to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Proxy,
    SharedFlow,
    ApiProduct,
    App,
}

impl ResourceGraph {
    /// Remove `name` from every dependent collection that may reference a
    /// resource of `kind`, across all entity kinds.
    pub fn prune_reference(&mut self, kind: ResourceKind, name: &str) {
        debug!(event = "core.graph.prune_reference", kind = ?kind, name = name);
        match kind {
            ResourceKind::Proxy => {
                for env in &mut self.environments {
                    env.proxies.retain(|p| p != name);
                }
                for sf in &mut self.sharedflows {
                    sf.proxies.retain(|p| p != name);
                }
                for product in &mut self.api_products {
                    product.proxies.retain(|p| p != name);
                }
            }
            ResourceKind::SharedFlow => {
                for env in &mut self.environments {
                    env.sharedflows.retain(|s| s != name);
                }
            }
            ResourceKind::ApiProduct => {
                for app in &mut self.apps {
                    app.api_products.retain(|p| p != name);
                }
            }
            ResourceKind::App => {
                for dev in &mut self.developers {
                    dev.apps.retain(|a| a != name);
                }
            }
        }
    }

    /// Drop product->proxy references that point at proxies no longer in the
    /// graph, so products whose only references were already-deleted proxies
    /// become eligible.
    pub fn resync_product_proxies(&mut self) {
        let existing: Vec<String> = self.proxies.iter().map(|p| p.name.clone()).collect();
        for product in &mut self.api_products {
            product.proxies.retain(|p| existing.contains(p));
        }
    }

    pub fn remove_proxy(&mut self, name: &str) {
        self.proxies.retain(|p| p.name != name);
    }

    pub fn remove_sharedflow(&mut self, name: &str) {
        self.sharedflows.retain(|s| s.name != name);
    }

    pub fn remove_api_product(&mut self, name: &str) {
        self.api_products.retain(|p| p.name != name);
    }

    pub fn remove_app(&mut self, name: &str) {
        self.apps.retain(|a| a.name != name);
    }

    pub fn remove_developer(&mut self, email: &str) {
        self.developers.retain(|d| d.email != email);
    }

    pub fn remove_environment(&mut self, name: &str) {
        self.environments.retain(|e| e.name != name);
    }
}
