//! Environment-driven configuration.
//!
//! Every reader has a `*_from` variant taking a lookup closure so tests never
//! touch the process environment.

use std::time::Duration;

use thiserror::Error;

use batchline_batch::{BatchConfig, TimeoutPolicy};
use batchline_events::IdentifierSource;

pub const SAFETY_MARGIN_MS_ENV: &str = "BATCH_SAFETY_MARGIN_MS";
pub const TIMEOUT_POLICY_ENV: &str = "BATCH_TIMEOUT_POLICY";
pub const ITEM_IDENTIFIER_ENV: &str = "BATCH_ITEM_IDENTIFIER";
pub const TIMEOUT_MS_ENV: &str = "BATCH_TIMEOUT_MS";

pub const DEFAULT_INVOCATION_TIMEOUT: Duration = Duration::from_secs(30);
/// Longest invocation the queue trigger allows.
pub const MAX_INVOCATION_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable '{0}' has not been set")]
    Missing(String),

    #[error("environment variable '{key}' is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read a required, non-blank variable.
pub fn require_env(key: &str) -> Result<String, ConfigError> {
    require_env_from(process_env, key)
}

pub fn require_env_from(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

/// Read a required variable holding a JSON array of strings,
/// e.g. `["g1234", "g5678"]`.
pub fn require_env_list(key: &str) -> Result<Vec<String>, ConfigError> {
    require_env_list_from(process_env, key)
}

pub fn require_env_list_from(
    lookup: impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Vec<String>, ConfigError> {
    let raw = require_env_from(lookup, key)?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::invalid(key, e.to_string()))
}

fn optional_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::invalid(key, e.to_string())),
        _ => Ok(None),
    }
}

/// Invocation timeout from `BATCH_TIMEOUT_MS`, defaulting to 30 seconds.
pub fn invocation_timeout() -> Result<Duration, ConfigError> {
    invocation_timeout_from(process_env)
}

pub fn invocation_timeout_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Duration, ConfigError> {
    let Some(ms) = optional_parsed::<u64>(&lookup, TIMEOUT_MS_ENV)? else {
        return Ok(DEFAULT_INVOCATION_TIMEOUT);
    };
    let timeout = Duration::from_millis(ms);
    if timeout.is_zero() || timeout > MAX_INVOCATION_TIMEOUT {
        return Err(ConfigError::invalid(
            TIMEOUT_MS_ENV,
            format!("must be between 1 and {} ms", MAX_INVOCATION_TIMEOUT.as_millis()),
        ));
    }
    Ok(timeout)
}

/// Settings of a queue-triggered batch handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueHandlerConfig {
    pub batch: BatchConfig,
    pub identifier: IdentifierSource,
}

impl QueueHandlerConfig {
    /// Defaults, overridden by `BATCH_SAFETY_MARGIN_MS`,
    /// `BATCH_TIMEOUT_POLICY` and `BATCH_ITEM_IDENTIFIER` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = optional_parsed::<u64>(&lookup, SAFETY_MARGIN_MS_ENV)? {
            config.batch = config.batch.with_safety_margin(Duration::from_millis(ms));
        }
        if let Some(policy) = optional_parsed::<TimeoutPolicy>(&lookup, TIMEOUT_POLICY_ENV)? {
            config.batch = config.batch.with_timeout_policy(policy);
        }
        if let Some(source) = optional_parsed::<IdentifierSource>(&lookup, ITEM_IDENTIFIER_ENV)? {
            config.identifier = source;
        }

        Ok(config)
    }
}
