use crate::api::errors::ApiError;
use crate::errors::SweepError;

#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    #[error("Listing {resource} failed with status {status}")]
    ListingFailed { resource: &'static str, status: u16 },

    #[error("Listing {resource} failed: {source}")]
    ListingUnavailable {
        resource: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Unexpected {resource} listing payload: {message}")]
    ListingMalformed {
        resource: &'static str,
        message: String,
    },
}

impl SweepError for CleanError {
    fn error_code(&self) -> &'static str {
        match self {
            CleanError::ListingFailed { .. } => "CLEAN_LISTING_FAILED",
            CleanError::ListingUnavailable { .. } => "CLEAN_LISTING_UNAVAILABLE",
            CleanError::ListingMalformed { .. } => "CLEAN_LISTING_MALFORMED",
        }
    }
}
