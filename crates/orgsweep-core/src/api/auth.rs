//! Bearer credential provisioning.
//!
//! Token minting itself (service-account exchange and friends) is an
//! external collaborator; the core only needs something that can hand out
//! the current token and produce a fresh one when the old one expires.

use crate::api::errors::ApiError;

/// Source of bearer tokens for the HTTP client.
pub trait TokenProvider {
    /// Current access token.
    fn access_token(&self) -> Result<String, ApiError>;

    /// Mint a fresh token after an authorization failure.
    fn refresh(&self) -> Result<String, ApiError>;
}

/// A fixed token, useful for short runs and tests.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }

    fn refresh(&self) -> Result<String, ApiError> {
        // Nothing to refresh; the transport will surface the final 401.
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every (re)request, so an
/// external refresher process can rotate it mid-run.
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TokenProvider for EnvToken {
    fn access_token(&self) -> Result<String, ApiError> {
        std::env::var(&self.var).map_err(|_| ApiError::AuthFailed {
            message: format!("environment variable '{}' is not set", self.var),
        })
    }

    fn refresh(&self) -> Result<String, ApiError> {
        self.access_token()
    }
}
