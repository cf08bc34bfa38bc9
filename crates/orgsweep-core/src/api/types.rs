//! Deserialization targets for the remote API payloads the cleaners read.

use serde::Deserialize;

/// Live application detail, fetched when revoking a product from its
/// credential keys.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppDetails {
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    #[serde(rename = "consumerKey")]
    pub consumer_key: String,

    #[serde(rename = "apiProducts", default)]
    pub api_products: Vec<CredentialProduct>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialProduct {
    #[serde(default)]
    pub apiproduct: String,
}

/// Anything the API lists as `{"name": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct InstanceList {
    #[serde(default)]
    pub instances: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AttachmentList {
    #[serde(default)]
    pub attachments: Vec<InstanceAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceAttachment {
    pub name: String,

    #[serde(default)]
    pub environment: String,
}

/// Report definitions come back under a `qualifier` key.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReportList {
    #[serde(default)]
    pub qualifier: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DataCollectorList {
    #[serde(rename = "dataCollectors", default)]
    pub data_collectors: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvGroupList {
    #[serde(rename = "environmentGroups", default)]
    pub environment_groups: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvGroupAttachmentList {
    #[serde(rename = "environmentGroupAttachments", default)]
    pub attachments: Vec<serde_json::Value>,
}

/// Reference to a long-running operation, returned by detach calls.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OperationRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Status of a long-running operation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OperationStatus {
    #[serde(default)]
    pub done: bool,

    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Deployment state of one revision in one environment.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeploymentState {
    #[serde(default)]
    pub state: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_details_camel_case_fields() {
        let json = r#"{
            "credentials": [{
                "consumerKey": "key-1",
                "apiProducts": [{"apiproduct": "prod1", "status": "approved"}]
            }]
        }"#;
        let details: AppDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.credentials[0].consumer_key, "key-1");
        assert_eq!(details.credentials[0].api_products[0].apiproduct, "prod1");
    }

    #[test]
    fn test_listing_defaults_to_empty() {
        let list: InstanceList = serde_json::from_str("{}").unwrap();
        assert!(list.instances.is_empty());

        let groups: EnvGroupList = serde_json::from_str("{}").unwrap();
        assert!(groups.environment_groups.is_empty());
    }

    #[test]
    fn test_operation_status_with_error() {
        let status: OperationStatus =
            serde_json::from_str(r#"{"done": true, "error": {"code": 13}}"#).unwrap();
        assert!(status.done);
        assert!(status.error.is_some());
    }
}
