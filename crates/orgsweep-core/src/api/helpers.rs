//! Shared delete-call semantics.

use tracing::{error, info};

use crate::api::client::ApiClient;

/// Issue a delete and report whether the resource is gone.
///
/// 404 is treated identically to success: the resource was already absent,
/// which is the state the caller wanted. Any other failure is logged and the
/// caller is expected to retain the entity in the graph; deletes are never
/// retried here.
pub fn api_delete(client: &dyn ApiClient, url: &str, resource: &str) -> bool {
    match client.delete(url) {
        Ok(resp) if resp.is_success() => {
            info!(event = "core.api.delete_completed", resource = resource);
            true
        }
        Ok(resp) if resp.is_not_found() => {
            info!(
                event = "core.api.delete_already_gone",
                resource = resource,
                message = "Resource was not found; it's already gone"
            );
            true
        }
        Ok(resp) => {
            error!(
                event = "core.api.delete_failed",
                resource = resource,
                status = resp.status,
                body = %resp.text()
            );
            false
        }
        Err(e) => {
            error!(
                event = "core.api.delete_error",
                resource = resource,
                error = %e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeClient;

    #[test]
    fn test_delete_success() {
        let client = FakeClient::new().on_delete("apis/p1", 204, b"");
        assert!(api_delete(&client, "https://x/v1/organizations/o/apis/p1", "proxy p1"));
    }

    #[test]
    fn test_delete_not_found_is_success() {
        let client = FakeClient::new().on_delete("apis/p1", 404, b"{}");
        assert!(api_delete(&client, "https://x/v1/organizations/o/apis/p1", "proxy p1"));
    }

    #[test]
    fn test_delete_failure_is_reported_not_retried() {
        let client = FakeClient::new().on_delete("apis/p1", 500, b"boom");
        assert!(!api_delete(&client, "https://x/v1/organizations/o/apis/p1", "proxy p1"));
        // Exactly one attempt
        assert_eq!(client.deletes_containing("apis/p1"), 1);
    }
}
