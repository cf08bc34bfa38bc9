//! Configuration type definitions.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! domain = "apigee.googleapis.com"
//! organization = "acme-sandbox"
//! token_env = "ORGSWEEP_TOKEN"
//!
//! [snapshot]
//! input = "hierarchy.json"
//! output = "hierarchy.json"
//!
//! [protected]
//! file = "protected-proxies.txt"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
///
/// This is the primary configuration structure that gets loaded from:
/// 1. User config: `~/.orgsweep/config.toml`
/// 2. Project config: `./.orgsweep/config.toml`
///
/// Project config values override user config values, and CLI flags
/// override both.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    /// Remote API endpoint and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Graph snapshot input/output paths
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Protected resource list
    #[serde(default)]
    pub protected: ProtectedConfig,
}

/// Remote API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API host to send requests to.
    #[serde(default = "super::defaults::default_domain")]
    pub domain: String,

    /// Organization whose resources are swept. Required; no safe default
    /// exists for a destructive tool.
    #[serde(default)]
    pub organization: Option<String>,

    /// Environment variable holding the bearer token.
    #[serde(default = "super::defaults::default_token_env")]
    pub token_env: String,
}

/// Snapshot file locations.
///
/// The run reads the extractor-produced hierarchy snapshot from `input` and
/// writes the post-run state to `output` so the next run starts from where
/// this one stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,

    #[serde(default = "super::defaults::default_snapshot_output")]
    pub output: PathBuf,
}

/// Protected resource list configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProtectedConfig {
    /// Path to a text file naming proxies that must never be deleted.
    /// Entries are separated by newlines or commas.
    #[serde(default)]
    pub file: Option<PathBuf>,
}
