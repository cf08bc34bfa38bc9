//! # Configuration System
//!
//! Hierarchical TOML configuration.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.orgsweep/config.toml` (global user preferences)
//! 3. **Project config** - `./.orgsweep/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.orgsweep/config.toml
//! [api]
//! organization = "acme-sandbox"
//!
//! [snapshot]
//! input = "hierarchy.json"
//!
//! [protected]
//! file = "protected-proxies.txt"
//! ```

pub mod defaults;
pub mod loading;
pub mod protected;
pub mod types;

// Public API exports
pub use protected::load_protected_list;
pub use types::{ApiConfig, ProtectedConfig, SnapshotConfig, SweepConfig};

impl SweepConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }
}
