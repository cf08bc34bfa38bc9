use std::error::Error;

/// Base trait for all application errors
pub trait SweepError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type SweepResult<T> = Result<T, Box<dyn SweepError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("No organization given. Pass --org or set api.organization in config")]
    MissingOrganization,

    #[error("No graph snapshot given. Pass --hierarchy or set snapshot.input in config")]
    MissingSnapshot,

    #[error("Failed to read protected resource list '{path}': {source}")]
    ProtectedListUnreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl SweepError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::MissingOrganization => "CONFIG_MISSING_ORGANIZATION",
            ConfigError::MissingSnapshot => "CONFIG_MISSING_SNAPSHOT",
            ConfigError::ProtectedListUnreadable { .. } => "CONFIG_PROTECTED_LIST_UNREADABLE",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. }
                | ConfigError::MissingOrganization
                | ConfigError::MissingSnapshot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_result() {
        let _result: SweepResult<i32> = Ok(42);
    }

    #[test]
    fn test_config_parse_error_display() {
        let error = ConfigError::ConfigParseError {
            path: "~/.orgsweep/config.toml".to_string(),
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config file '~/.orgsweep/config.toml': invalid TOML syntax"
        );
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_missing_organization_error() {
        let error = ConfigError::MissingOrganization;
        assert_eq!(error.error_code(), "CONFIG_MISSING_ORGANIZATION");
        assert!(error.is_user_error());
    }
}
