//! Blocking HTTP client with transparent credential refresh.

use std::cell::RefCell;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::api::auth::TokenProvider;
use crate::api::errors::ApiError;

/// Maximum re-sends after an authorization failure before surfacing the
/// final response to the caller.
const MAX_AUTH_RETRIES: u32 = 3;

/// Minimal response surface the core needs: a status code and raw bytes.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The capability set the cleaners consume.
pub trait ApiClient {
    fn get(&self, url: &str) -> Result<ApiResponse, ApiError>;
    fn delete(&self, url: &str) -> Result<ApiResponse, ApiError>;
}

/// Blocking reqwest transport. The cached bearer token lives in a `RefCell`
/// because the whole run is single-threaded by contract; there is never a
/// second borrower.
pub struct HttpClient {
    http: reqwest::blocking::Client,
    tokens: Box<dyn TokenProvider>,
    bearer: RefCell<Option<String>>,
}

impl HttpClient {
    pub fn new(tokens: Box<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            tokens,
            bearer: RefCell::new(None),
        }
    }

    fn bearer(&self) -> Result<String, ApiError> {
        let cached = self.bearer.borrow().clone();
        match cached {
            Some(token) => Ok(token),
            None => {
                let token = self.tokens.access_token()?;
                *self.bearer.borrow_mut() = Some(token.clone());
                Ok(token)
            }
        }
    }

    fn send(&self, method: reqwest::Method, url: &str) -> Result<ApiResponse, ApiError> {
        let token = self.bearer()?;
        let response = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .send()
            .map_err(|source| ApiError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|source| ApiError::RequestFailed {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        Ok(ApiResponse { status, body })
    }

    fn execute(&self, method: reqwest::Method, url: &str) -> Result<ApiResponse, ApiError> {
        let mut response = self.send(method.clone(), url)?;

        let mut retries = 0;
        while response.status == 401 && retries < MAX_AUTH_RETRIES {
            warn!(
                event = "core.api.credential_expired",
                url = url,
                retry = retries + 1
            );
            let refreshed = self.tokens.refresh()?;
            *self.bearer.borrow_mut() = Some(refreshed);
            response = self.send(method.clone(), url)?;
            retries += 1;
        }

        Ok(response)
    }
}

impl ApiClient for HttpClient {
    fn get(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.execute(reqwest::Method::GET, url)
    }

    fn delete(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.execute(reqwest::Method::DELETE, url)
    }
}

/// Client wrapper that suppresses every destructive call: reads pass
/// through, deletes are logged and answered with a synthetic success.
pub struct DryRun<C> {
    inner: C,
}

impl<C> DryRun<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: ApiClient> ApiClient for DryRun<C> {
    fn get(&self, url: &str) -> Result<ApiResponse, ApiError> {
        self.inner.get(url)
    }

    fn delete(&self, url: &str) -> Result<ApiResponse, ApiError> {
        info!(event = "core.api.dry_run_delete", url = url);
        Ok(ApiResponse {
            status: 200,
            body: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeClient;

    #[test]
    fn test_api_response_predicates() {
        let ok = ApiResponse {
            status: 204,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!ok.is_not_found());

        let gone = ApiResponse {
            status: 404,
            body: Vec::new(),
        };
        assert!(!gone.is_success());
        assert!(gone.is_not_found());
    }

    #[test]
    fn test_api_response_json() {
        let resp = ApiResponse {
            status: 200,
            body: br#"{"name": "op-1"}"#.to_vec(),
        };
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["name"], "op-1");
    }

    #[test]
    fn test_dry_run_never_issues_deletes() {
        let fake = FakeClient::new();
        let client = DryRun::new(fake);

        let resp = client.delete("https://example/v1/organizations/o/apis/p1").unwrap();
        assert!(resp.is_success());

        // The inner client never saw the delete
        assert_eq!(client.inner.deletes_containing("apis/p1"), 0);
    }

    #[test]
    fn test_dry_run_reads_pass_through() {
        let fake = FakeClient::new().on_get("instances", 200, br#"{"instances": []}"#);
        let client = DryRun::new(fake);

        let resp = client.get("https://example/v1/organizations/o/instances").unwrap();
        assert_eq!(resp.text(), r#"{"instances": []}"#);
        assert_eq!(client.inner.calls().len(), 1);
    }
}
