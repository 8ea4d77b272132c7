//! Configuration management utilities
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `AGENT_MODEL` | `model` |
//! | `AGENT_MAX_TOOL_ROUNDS` | `max_tool_rounds` |
//! | `AGENT_LOG_FORMAT` | `log_format` |

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::logging::LogFormat;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Longest accepted retry delay, in seconds
pub const MAX_RETRY_DELAY_SECS: f64 = 3600.0;

/// Largest accepted retry backoff multiplier
pub const MAX_BACKOFF_MULTIPLIER: f64 = 100.0;

/// Retry settings for capability calls
///
/// Plain data; `agent_llm::RetryPolicy` is built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts including the first one
    pub attempts: u32,
    /// Delay before the first retry, in seconds
    pub initial_delay_secs: f64,
    /// Factor applied to the delay after every retry
    pub backoff_multiplier: f64,
    /// Upper bound for a single delay, in seconds
    pub max_delay_secs: f64,
    /// HTTP statuses considered transient
    pub http_status_codes: Vec<u16>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay_secs: 1.0,
            backoff_multiplier: 7.0,
            max_delay_secs: 60.0,
            http_status_codes: vec![429, 500, 503, 504],
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model identifier used by agents that don't name one
    pub model: String,
    /// Max tokens per completion
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Tool-call rounds allowed per agent invocation
    pub max_tool_rounds: usize,
    /// Log output format
    pub log_format: LogFormat,
    /// Retry settings for the capability backend
    pub retry: RetrySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            max_tool_rounds: 10,
            log_format: LogFormat::Pretty,
            retry: RetrySettings::default(),
        }
    }
}

impl Config {
    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        tracing::debug!(
            source = %path.map_or_else(|| "defaults".to_string(), |p| p.display().to_string()),
            model = %config.model,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("AGENT_MODEL") {
            self.model = model;
        }
        if let Some(rounds) = lookup("AGENT_MAX_TOOL_ROUNDS") {
            self.max_tool_rounds = rounds.parse().map_err(|_| {
                ConfigError::Invalid(format!("AGENT_MAX_TOOL_ROUNDS is not a number: {rounds}"))
            })?;
        }
        if let Some(format) = lookup("AGENT_LOG_FORMAT") {
            self.log_format = format.parse().map_err(ConfigError::Invalid)?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.max_tool_rounds == 0 {
            return Err(ConfigError::Invalid(
                "max_tool_rounds must be at least 1".to_string(),
            ));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.attempts must be at least 1".to_string(),
            ));
        }
        let multiplier = self.retry.backoff_multiplier;
        if !(1.0..=MAX_BACKOFF_MULTIPLIER).contains(&multiplier) {
            return Err(ConfigError::Invalid(format!(
                "retry.backoff_multiplier must be between 1.0 and {MAX_BACKOFF_MULTIPLIER}, got {multiplier}"
            )));
        }
        for (field, secs) in [
            ("initial_delay_secs", self.retry.initial_delay_secs),
            ("max_delay_secs", self.retry.max_delay_secs),
        ] {
            if !(0.0..=MAX_RETRY_DELAY_SECS).contains(&secs) {
                return Err(ConfigError::Invalid(format!(
                    "retry.{field} must be between 0 and {MAX_RETRY_DELAY_SECS} seconds, got {secs}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_tool_rounds, 10);
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.http_status_codes, vec![429, 500, 503, 504]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            model = "claude-haiku-4-5"
            log_format = "json"

            [retry]
            attempts = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "claude-haiku-4-5");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.retry.attempts, 2);
        assert_eq!(config.retry.backoff_multiplier, 7.0);
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_toml_str("max_tool_rounds = 0").is_err());
        assert!(Config::from_toml_str("[retry]\nattempts = 0").is_err());
        assert!(Config::from_toml_str("[retry]\nbackoff_multiplier = 0.5").is_err());
        assert!(Config::from_toml_str("model = 3").is_err());
    }

    #[test]
    fn test_out_of_range_retry_values_rejected() {
        for source in [
            "[retry]\nmax_delay_secs = inf",
            "[retry]\ninitial_delay_secs = 1e30",
            "[retry]\ninitial_delay_secs = nan",
            "[retry]\nmax_delay_secs = -1.0",
            "[retry]\nbackoff_multiplier = nan",
            "[retry]\nbackoff_multiplier = 1e9",
        ] {
            let err = Config::from_toml_str(source).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{source} should be rejected");
        }

        let config = Config::from_toml_str("[retry]\nmax_delay_secs = 3600.0").unwrap();
        assert_eq!(config.retry.max_delay_secs, MAX_RETRY_DELAY_SECS);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(|key| match key {
                "AGENT_MODEL" => Some("local-model".to_string()),
                "AGENT_MAX_TOOL_ROUNDS" => Some("3".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.model, "local-model");
        assert_eq!(config.max_tool_rounds, 3);
        assert_eq!(config.log_format, LogFormat::Pretty);

        let err = Config::default()
            .with_overrides(|key| (key == "AGENT_MAX_TOOL_ROUNDS").then(|| "many".to_string()));
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
