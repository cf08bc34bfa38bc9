//! URL construction for every endpoint the cleaners touch.

/// The two resource classes that carry deployable revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployableKind {
    Proxy,
    SharedFlow,
}

impl DeployableKind {
    /// API collection segment.
    pub fn collection(&self) -> &'static str {
        match self {
            DeployableKind::Proxy => "apis",
            DeployableKind::SharedFlow => "sharedflows",
        }
    }

    /// Folder prefix distinguishing this kind's configuration fragments
    /// inside a revision bundle.
    pub fn policies_prefix(&self) -> &'static str {
        match self {
            DeployableKind::Proxy => "apiproxy/policies/",
            DeployableKind::SharedFlow => "sharedflowbundle/policies/",
        }
    }
}

/// Builds organization-scoped API URLs.
#[derive(Debug, Clone)]
pub struct OrgApi {
    domain: String,
    base: String,
}

impl OrgApi {
    pub fn new(domain: &str, organization: &str) -> Self {
        Self {
            domain: domain.to_string(),
            base: format!("https://{domain}/v1/organizations/{organization}"),
        }
    }

    pub fn proxy(&self, name: &str) -> String {
        format!("{}/apis/{name}", self.base)
    }

    pub fn sharedflow(&self, name: &str) -> String {
        format!("{}/sharedflows/{name}", self.base)
    }

    /// Deployment endpoint of one revision in one environment. DELETE
    /// requests undeploy; GET reports deployment state.
    pub fn deployments(&self, kind: DeployableKind, env: &str, name: &str, revision: &str) -> String {
        format!(
            "{}/environments/{env}/{}/{name}/revisions/{revision}/deployments",
            self.base,
            kind.collection()
        )
    }

    /// Downloadable revision bundle (zip of configuration fragments).
    pub fn revision_bundle(&self, kind: DeployableKind, name: &str, revision: &str) -> String {
        format!(
            "{}/{}/{name}/revisions/{revision}?format=bundle",
            self.base,
            kind.collection()
        )
    }

    pub fn flowhook(&self, env: &str, hook: &str) -> String {
        format!("{}/environments/{env}/flowhooks/{hook}", self.base)
    }

    pub fn api_product(&self, name: &str) -> String {
        format!("{}/apiproducts/{name}", self.base)
    }

    pub fn developer(&self, email: &str) -> String {
        format!("{}/developers/{email}", self.base)
    }

    pub fn developer_app(&self, email: &str, app: &str) -> String {
        format!("{}/developers/{email}/apps/{app}", self.base)
    }

    /// Revocation endpoint of one product on one credential key.
    pub fn app_key_product(&self, email: &str, app: &str, key: &str, product: &str) -> String {
        format!(
            "{}/developers/{email}/apps/{app}/keys/{key}/apiproducts/{product}",
            self.base
        )
    }

    pub fn org_kvm(&self, name: &str) -> String {
        format!("{}/keyvaluemaps/{name}", self.base)
    }

    pub fn env_kvm(&self, env: &str, name: &str) -> String {
        format!("{}/environments/{env}/keyvaluemaps/{name}", self.base)
    }

    pub fn environment(&self, name: &str) -> String {
        format!("{}/environments/{name}", self.base)
    }

    pub fn instances(&self) -> String {
        format!("{}/instances?pageSize=100", self.base)
    }

    pub fn instance(&self, name: &str) -> String {
        format!("{}/instances/{name}", self.base)
    }

    pub fn instance_attachments(&self, instance: &str) -> String {
        format!("{}/instances/{instance}/attachments?pageSize=100", self.base)
    }

    pub fn instance_attachment(&self, instance: &str, attachment: &str) -> String {
        format!("{}/instances/{instance}/attachments/{attachment}", self.base)
    }

    pub fn reports(&self) -> String {
        format!("{}/reports", self.base)
    }

    pub fn report(&self, name: &str) -> String {
        format!("{}/reports/{name}", self.base)
    }

    pub fn data_collectors(&self) -> String {
        format!("{}/datacollectors?pageSize=100", self.base)
    }

    pub fn data_collector(&self, name: &str) -> String {
        format!("{}/datacollectors/{name}", self.base)
    }

    pub fn env_groups(&self) -> String {
        format!("{}/envgroups?pageSize=100", self.base)
    }

    pub fn env_group(&self, name: &str) -> String {
        format!("{}/envgroups/{name}", self.base)
    }

    pub fn env_group_attachments(&self, name: &str) -> String {
        format!("{}/envgroups/{name}/attachments", self.base)
    }

    /// Status endpoint of a long-running operation; operation names come
    /// back fully qualified (`organizations/o/operations/uuid`).
    pub fn operation(&self, operation_name: &str) -> String {
        format!("https://{}/v1/{operation_name}", self.domain)
    }
}
