//! Environment-driven logging configuration.
//!
//! The suggestion toggle and the log level can be supplied through the
//! environment. How these values rank against command-line flags or explicit
//! [`LoggingPolicy::set_config`](crate::logging::LoggingPolicy::set_config)
//! calls is up to the embedding application.

use crate::logging::LoggingConfig;
use log::LevelFilter;
use std::str::FromStr;

/// Variable holding the suggestion toggle.
pub const LOG_SUGGESTIONS_VAR: &str = "DIRECTORY_SYNC_LOG_SUGGESTIONS";

/// Variable holding the log level name.
pub const LOG_LEVEL_VAR: &str = "DIRECTORY_SYNC_LOG_LEVEL";

/// Errors raised while reading configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid boolean '{value}' for {variable}")]
    InvalidBool { variable: String, value: String },

    #[error("invalid log level '{value}' for {variable}, expected one of off, error, warn, info, debug, trace")]
    InvalidLevel { variable: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl LoggingConfig {
    /// Read overrides from the process environment on top of the defaults.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`, starting from [`LoggingConfig::DEFAULT`].
    ///
    /// Unset or blank variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LoggingConfig::DEFAULT;

        if let Some(value) = non_blank(lookup(LOG_SUGGESTIONS_VAR)) {
            config.log_suggestions = parse_bool(LOG_SUGGESTIONS_VAR, &value)?;
        }

        if let Some(value) = non_blank(lookup(LOG_LEVEL_VAR)) {
            config.log_level =
                LevelFilter::from_str(value.trim()).map_err(|_| ConfigError::InvalidLevel {
                    variable: LOG_LEVEL_VAR.to_string(),
                    value: value.clone(),
                })?;
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(variable: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            variable: variable.to_string(),
            value: value.to_string(),
        }),
    }
}
