//! Resource graph type definitions.
//!
//! Serde field names follow the snapshot document produced by the hierarchy
//! extractor (`proxy`, `sharedflow`, `apiproduct`, ...), so a snapshot
//! written by one run can be loaded unchanged by the next.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root aggregate owning every organization resource known to the run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceGraph {
    #[serde(rename = "proxy", default)]
    pub proxies: Vec<Proxy>,

    #[serde(rename = "sharedflow", default)]
    pub sharedflows: Vec<SharedFlow>,

    #[serde(rename = "apiproduct", default)]
    pub api_products: Vec<ApiProduct>,

    #[serde(rename = "app", default)]
    pub apps: Vec<App>,

    #[serde(default)]
    pub developers: Vec<Developer>,

    /// Organization-scoped key/value map names.
    #[serde(rename = "organization_kvm", default)]
    pub organization_kvms: Vec<String>,

    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// One deployable API proxy and its revisions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Proxy {
    pub name: String,

    /// Revision key -> deployment detail. Keys may carry a `|`-suffixed
    /// deploy marker; use [`revision_id`] when building URLs.
    #[serde(default)]
    pub revisions: BTreeMap<String, RevisionDeployment>,
}

/// Where (if anywhere) a revision is deployed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RevisionDeployment {
    /// The extractor historically wrote `enviroment` for proxy revisions;
    /// accept both spellings, always write the correct one.
    #[serde(default, alias = "enviroment", skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// A shared flow plus the proxies that still reference it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SharedFlow {
    pub name: String,

    #[serde(default)]
    pub revisions: BTreeMap<String, RevisionDeployment>,

    /// Names of proxies whose bundles call into this shared flow.
    #[serde(rename = "proxy", default)]
    pub proxies: Vec<String>,
}

/// An API product and the proxies/apps bound to it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiProduct {
    pub name: String,

    #[serde(rename = "proxy", default)]
    pub proxies: Vec<String>,

    #[serde(rename = "app", default)]
    pub apps: Vec<String>,
}

/// A developer application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct App {
    pub name: String,

    /// Email of the owning developer.
    #[serde(default)]
    pub developer: String,

    #[serde(rename = "apiproduct", default)]
    pub api_products: Vec<String>,
}

/// A developer and the apps they own.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Developer {
    pub email: String,

    #[serde(rename = "app", default)]
    pub apps: Vec<String>,
}

/// A runtime environment and everything attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Environment {
    pub name: String,

    #[serde(rename = "proxy", default)]
    pub proxies: Vec<String>,

    #[serde(rename = "sharedflow", default)]
    pub sharedflows: Vec<String>,

    /// Environment-scoped key/value map names.
    #[serde(rename = "kvm", default)]
    pub kvms: Vec<String>,

    #[serde(rename = "flowhook", default)]
    pub flowhooks: Vec<FlowHook>,
}

/// One of the four fixed flow-hook slots of an environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowHook {
    /// Slot name (`PreProxyFlowHook`, `PostProxyFlowHook`, ...).
    pub name: String,

    /// Bound shared flow name, empty when the slot is vacant.
    #[serde(default)]
    pub sharedflow: String,
}

/// Strip the deploy marker from a revision map key (`"12|deployed"` -> `"12"`).
pub fn revision_id(key: &str) -> &str {
    key.split('|').next().unwrap_or(key)
}

impl Environment {
    /// An environment is eligible for deletion only when no proxies and no
    /// shared flows remain in it.
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty() && self.sharedflows.is_empty()
    }

    /// A live environment hosts at least one proxy; a flow-hook attachment
    /// here blocks shared-flow deletion.
    pub fn hosts_proxies(&self) -> bool {
        !self.proxies.is_empty()
    }
}

impl SharedFlow {
    pub fn has_proxy_references(&self) -> bool {
        !self.proxies.is_empty()
    }
}
