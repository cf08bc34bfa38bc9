//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.orgsweep/config.toml` (global user preferences)
//! 3. **Project config** - `./.orgsweep/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::Path;

use crate::config::types::{ApiConfig, SnapshotConfig, SweepConfig};
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error on unreadable or unparseable files. Missing config
/// files are not errors.
pub fn load_hierarchy() -> Result<SweepConfig, ConfigError> {
    let mut config = SweepConfig::default();

    if let Some(home_dir) = dirs::home_dir() {
        let user_path = home_dir.join(".orgsweep").join("config.toml");
        if let Some(user_config) = load_config_file(&user_path)? {
            config = merge_configs(config, user_config);
        }
    }

    let project_path = std::env::current_dir()?
        .join(".orgsweep")
        .join("config.toml");
    if let Some(project_config) = load_config_file(&project_path)? {
        config = merge_configs(config, project_config);
    }

    Ok(config)
}

/// Load a configuration file from the given path. A missing file yields
/// `None`; any other read failure or a parse failure is an error.
fn load_config_file(path: &Path) -> Result<Option<SweepConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ConfigError::IoError { source }),
    };

    let config: SweepConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence.
///
/// Optional fields replace base values only if present. The `domain` and
/// `token_env` fields always take the override's value, so a project config
/// lacking an `[api]` section resets them to their defaults.
pub fn merge_configs(base: SweepConfig, override_config: SweepConfig) -> SweepConfig {
    SweepConfig {
        api: ApiConfig {
            domain: override_config.api.domain,
            organization: override_config.api.organization.or(base.api.organization),
            token_env: override_config.api.token_env,
        },
        snapshot: SnapshotConfig {
            input: override_config.snapshot.input.or(base.snapshot.input),
            output: override_config.snapshot.output,
        },
        protected: crate::config::types::ProtectedConfig {
            file: override_config.protected.file.or(base.protected.file),
        },
    }
}
