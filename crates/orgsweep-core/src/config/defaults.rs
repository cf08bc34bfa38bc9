//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations and helper functions
//! for providing default values in serde deserialization.

use std::path::PathBuf;

use crate::config::types::{ApiConfig, SnapshotConfig};

/// Returns the default API host.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_domain() -> String {
    "apigee.googleapis.com".to_string()
}

/// Returns the default bearer-token environment variable name.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_token_env() -> String {
    "ORGSWEEP_TOKEN".to_string()
}

/// Returns the default snapshot output path.
///
/// Matches the extractor's default output name so runs chain without
/// configuration.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_snapshot_output() -> PathBuf {
    PathBuf::from("hierarchy.json")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            organization: None,
            token_env: default_token_env(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: default_snapshot_output(),
        }
    }
}
