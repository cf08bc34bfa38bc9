//! Protected proxy list loading.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::ConfigError;

/// Read a protected proxy list: one name per line, with commas also accepted
/// as separators. Blank entries are dropped, surrounding whitespace trimmed.
pub fn load_protected_list(path: &Path) -> Result<BTreeSet<String>, ConfigError> {
    let content =
        fs::read_to_string(path).map_err(|source| ConfigError::ProtectedListUnreadable {
            path: path.display().to_string(),
            source,
        })?;

    let names: BTreeSet<String> = content
        .lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    info!(
        event = "core.config.protected_list_loaded",
        path = %path.display(),
        count = names.len()
    );
    Ok(names)
}
