//! orgsweep-core: Core library for dependency-ordered API organization cleanup
//!
//! This library holds the business logic for decommissioning an
//! API-management organization's resource graph: proxies, shared flows,
//! products, apps, developers, key/value maps, environments, data
//! collectors, reports, environment groups and runtime instances. It is
//! consumed by the `orgsweep` CLI.
//!
//! # Main Entry Points
//!
//! - [`graph`] - In-memory resource graph and snapshot persistence
//! - [`cleaners`] - Per-resource-kind deletion passes
//! - [`runner`] - Ordered execution of the cleaner list
//! - [`bundle`] - Static analysis of deployable configuration bundles
//! - [`api`] - HTTP client, URL building, operation polling
//! - [`config`] - Configuration management

pub mod api;
pub mod bundle;
pub mod cleaners;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod runner;

// Re-export commonly used types at crate root for convenience
pub use api::{ApiClient, ApiError, DryRun, EnvToken, HttpClient, OrgApi, StaticToken, WaitPolicy};
pub use cleaners::{CleanContext, CleanError, CleanStats, Cleaner};
pub use config::SweepConfig;
pub use errors::{ConfigError, SweepError};
pub use graph::types::{
    App, Developer, Environment, FlowHook, Proxy, ResourceGraph, SharedFlow,
};
pub use graph::{GraphError, ResourceKind};
pub use runner::{CleanerOutcome, RunSummary, run_cleanup};

// Re-export logging initialization
pub use logging::init_logging;
