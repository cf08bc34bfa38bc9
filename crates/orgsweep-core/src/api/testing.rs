//! Scripted API client for tests.

use std::cell::RefCell;

use crate::api::client::{ApiClient, ApiResponse};
use crate::api::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
}

struct Rule {
    method: &'static str,
    url_fragment: String,
    status: u16,
    body: Vec<u8>,
}

/// Records every call and answers from a list of (method, url-fragment)
/// rules, first match wins. Unmatched calls get a 200 with an empty JSON
/// object, which reads as "deleted fine" / "nothing listed" in most tests.
#[derive(Default)]
pub struct FakeClient {
    rules: Vec<Rule>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(mut self, url_fragment: &str, status: u16, body: &[u8]) -> Self {
        self.rules.push(Rule {
            method: "GET",
            url_fragment: url_fragment.to_string(),
            status,
            body: body.to_vec(),
        });
        self
    }

    pub fn on_delete(mut self, url_fragment: &str, status: u16, body: &[u8]) -> Self {
        self.rules.push(Rule {
            method: "DELETE",
            url_fragment: url_fragment.to_string(),
            status,
            body: body.to_vec(),
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn deletes_containing(&self, fragment: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == "DELETE" && c.url.contains(fragment))
            .count()
    }

    pub fn gets_containing(&self, fragment: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == "GET" && c.url.contains(fragment))
            .count()
    }

    /// Suffix match, for URLs whose prefix also appears in longer sibling
    /// endpoints (`/apis/p1` vs `/apis/p1/revisions/3/deployments`).
    pub fn deletes_ending_with(&self, suffix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == "DELETE" && c.url.ends_with(suffix))
            .count()
    }

    fn respond(&self, method: &'static str, url: &str) -> ApiResponse {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            url: url.to_string(),
        });

        for rule in &self.rules {
            if rule.method == method && url.contains(&rule.url_fragment) {
                return ApiResponse {
                    status: rule.status,
                    body: rule.body.clone(),
                };
            }
        }

        ApiResponse {
            status: 200,
            body: b"{}".to_vec(),
        }
    }
}

impl ApiClient for FakeClient {
    fn get(&self, url: &str) -> Result<ApiResponse, ApiError> {
        Ok(self.respond("GET", url))
    }

    fn delete(&self, url: &str) -> Result<ApiResponse, ApiError> {
        Ok(self.respond("DELETE", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_rule_wins() {
        let client = FakeClient::new()
            .on_get("attachments", 200, br#"{"attachments": [{"name": "a", "environment": "dev"}]}"#)
            .on_get("attachments", 500, b"");

        let resp = client.get("https://x/instances/i1/attachments").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(client.gets_containing("attachments"), 1);
    }

    #[test]
    fn test_unmatched_calls_default_to_empty_success() {
        let client = FakeClient::new();
        let resp = client.delete("https://x/apis/p1").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.text(), "{}");
    }
}
