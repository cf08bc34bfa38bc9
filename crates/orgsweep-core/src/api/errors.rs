use crate::errors::SweepError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request to '{url}' failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Credential provisioning failed: {message}")]
    AuthFailed { message: String },

    #[error("Unexpected response from '{url}': {message}")]
    InvalidResponse { url: String, message: String },
}

impl SweepError for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::RequestFailed { .. } => "API_REQUEST_FAILED",
            ApiError::AuthFailed { .. } => "API_AUTH_FAILED",
            ApiError::InvalidResponse { .. } => "API_INVALID_RESPONSE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ApiError::AuthFailed { .. })
    }
}
