//! API-product cleanup: revoke from app credentials, then delete.

use tracing::{info, warn};

use crate::api::helpers::api_delete;
use crate::api::types::AppDetails;
use crate::cleaners::errors::CleanError;
use crate::cleaners::types::{CleanContext, CleanStats, Cleaner};
use crate::graph::operations::ResourceKind;
use crate::graph::types::ResourceGraph;

pub struct ApiProductCleaner;

/// Fetch live app detail. Any failure degrades to an empty credential list;
/// the product delete still goes ahead and the server refuses it if a key
/// binding really remains.
fn app_details(ctx: &CleanContext, developer: &str, app: &str) -> AppDetails {
    let url = ctx.api.developer_app(developer, app);
    let response = match ctx.client.get(&url) {
        Ok(r) => r,
        Err(e) => {
            warn!(
                event = "core.apiproduct.app_fetch_failed",
                developer = developer,
                app = app,
                error = %e
            );
            return AppDetails::default();
        }
    };
    if !response.is_success() {
        warn!(
            event = "core.apiproduct.app_fetch_failed",
            developer = developer,
            app = app,
            status = response.status
        );
        return AppDetails::default();
    }
    match response.json::<AppDetails>() {
        Ok(details) => details,
        Err(e) => {
            warn!(
                event = "core.apiproduct.app_payload_malformed",
                developer = developer,
                app = app,
                error = %e
            );
            AppDetails::default()
        }
    }
}

/// Revoke `product` from every credential of `app` that carries it.
fn revoke_from_app(ctx: &CleanContext, developer: &str, app: &str, product: &str) {
    let details = app_details(ctx, developer, app);
    for credential in &details.credentials {
        let bound = credential
            .api_products
            .iter()
            .any(|p| p.apiproduct == product);
        if !bound {
            continue;
        }
        info!(
            event = "core.apiproduct.key_revocation_started",
            product = product,
            app = app,
            key = %credential.consumer_key
        );
        let url = ctx
            .api
            .app_key_product(developer, app, &credential.consumer_key, product);
        if let Err(e) = ctx.client.delete(&url) {
            warn!(
                event = "core.apiproduct.key_revocation_failed",
                product = product,
                app = app,
                error = %e
            );
        }
    }
}

impl Cleaner for ApiProductCleaner {
    fn name(&self) -> &'static str {
        "apiproduct"
    }

    fn delete(
        &self,
        graph: &mut ResourceGraph,
        ctx: &CleanContext,
    ) -> Result<CleanStats, CleanError> {
        // Products whose only proxy references were deleted by the proxy
        // pass become eligible here.
        graph.resync_product_proxies();

        info!(
            event = "core.apiproduct.clean_started",
            total = graph.api_products.len()
        );
        let mut stats = CleanStats::default();

        let names: Vec<String> = graph.api_products.iter().map(|p| p.name.clone()).collect();
        for name in names {
            let product = graph.api_products.iter().find(|p| p.name == name);
            let Some(product) = product else { continue };

            if !product.proxies.is_empty() {
                info!(
                    event = "core.apiproduct.live_proxy_skip",
                    product = %name,
                    message = "Product still exposes existing proxies"
                );
                stats.skipped += 1;
                continue;
            }

            // Revoke the product from every bound app before deleting it.
            let bound_apps = product.apps.clone();
            for app_name in &bound_apps {
                let developer = graph
                    .apps
                    .iter()
                    .find(|a| &a.name == app_name)
                    .map(|a| a.developer.clone());
                let Some(developer) = developer else {
                    warn!(
                        event = "core.apiproduct.unknown_app_binding",
                        product = %name,
                        app = %app_name
                    );
                    continue;
                };
                revoke_from_app(ctx, &developer, app_name, &name);
            }

            graph.prune_reference(ResourceKind::ApiProduct, &name);

            if api_delete(
                ctx.client,
                &ctx.api.api_product(&name),
                &format!("apiproduct {name}"),
            ) {
                graph.remove_api_product(&name);
                stats.deleted += 1;
            } else {
                stats.retained += 1;
            }
        }

        info!(
            event = "core.apiproduct.clean_completed",
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
    use crate::graph::types::{ApiProduct, App, Proxy};

    fn ctx<'a>(client: &'a FakeClient, api: &'a OrgApi) -> CleanContext<'a> {
        CleanContext {
            client,
            api,
            undeploy_wait: waiter::immediate_policy(),
            attachment_wait: waiter::immediate_policy(),
        }
    }

    fn graph_with_bound_product() -> ResourceGraph {
        ResourceGraph {
            api_products: vec![ApiProduct {
                name: "prod1".to_string(),
                proxies: vec![],
                apps: vec!["app1".to_string()],
            }],
            apps: vec![App {
                name: "app1".to_string(),
                developer: "dev@x".to_string(),
                api_products: vec!["prod1".to_string()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_revokes_bound_keys_then_deletes() {
        let client = FakeClient::new().on_get(
            "/developers/dev@x/apps/app1",
            200,
            br#"{"credentials": [
                {"consumerKey": "k1", "apiProducts": [{"apiproduct": "prod1"}]},
                {"consumerKey": "k2", "apiProducts": [{"apiproduct": "other"}]}
            ]}"#,
        );
        let api = OrgApi::new("x", "o");
        let mut graph = graph_with_bound_product();

        let stats = ApiProductCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.deleted, 1);
        assert!(graph.api_products.is_empty());
        // Only the credential carrying the product is revoked
        assert_eq!(
            client.deletes_containing("apps/app1/keys/k1/apiproducts/prod1"),
            1
        );
        assert_eq!(client.deletes_containing("keys/k2"), 0);
        assert_eq!(client.deletes_ending_with("/apiproducts/prod1"), 2);
        // App no longer claims the product locally
        assert!(graph.apps[0].api_products.is_empty());
    }

    #[test]
    fn test_live_proxy_reference_gates_deletion() {
        let client = FakeClient::new();
        let api = OrgApi::new("x", "o");
        let mut graph = graph_with_bound_product();
        graph.proxies.push(Proxy {
            name: "p1".to_string(),
            ..Default::default()
        });
        graph.api_products[0].proxies.push("p1".to_string());

        let stats = ApiProductCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(graph.api_products.len(), 1);
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_resync_unblocks_product_of_deleted_proxy() {
        // Product references a proxy already gone from the graph: the stale
        // reference is dropped and the product deleted.
        let client = FakeClient::new();
        let api = OrgApi::new("x", "o");
        let mut graph = graph_with_bound_product();
        graph.api_products[0].proxies.push("deleted-proxy".to_string());

        let stats = ApiProductCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.deleted, 1);
        assert!(graph.api_products.is_empty());
    }

    #[test]
    fn test_unreachable_app_detail_does_not_block_delete() {
        let client = FakeClient::new().on_get("/developers/dev@x/apps/app1", 500, b"");
        let api = OrgApi::new("x", "o");
        let mut graph = graph_with_bound_product();

        let stats = ApiProductCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.deleted, 1);
        assert_eq!(client.deletes_containing("keys/"), 0);
    }

    #[test]
    fn test_failed_delete_retains_product() {
        let client = FakeClient::new().on_delete("/apiproducts/prod1", 403, b"");
        let api = OrgApi::new("x", "o");
        let mut graph = ResourceGraph {
            api_products: vec![ApiProduct {
                name: "prod1".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let stats = ApiProductCleaner.delete(&mut graph, &ctx(&client, &api)).unwrap();

        assert_eq!(stats.retained, 1);
        assert_eq!(graph.api_products.len(), 1);
    }
}
