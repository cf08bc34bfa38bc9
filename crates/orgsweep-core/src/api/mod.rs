//! HTTP transport and remote API plumbing.
//!
//! The cleaners only see the [`ApiClient`] trait; the blocking
//! [`HttpClient`] implementation handles bearer-credential refresh and
//! retry. URL construction lives in [`OrgApi`] so endpoint shapes are in
//! one place.

pub mod auth;
pub mod client;
pub mod errors;
pub mod helpers;
pub mod types;
pub mod urls;
pub mod waiter;

#[cfg(test)]
pub mod testing;

pub use auth::{EnvToken, StaticToken, TokenProvider};
pub use client::{ApiClient, ApiResponse, DryRun, HttpClient};
pub use errors::ApiError;
pub use helpers::api_delete;
pub use urls::{DeployableKind, OrgApi};
pub use waiter::{WaitPolicy, wait_for_operation, wait_for_undeploy};
