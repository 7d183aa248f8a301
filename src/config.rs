//! Retry configuration.
//!
//! `RetryConfig` is owned by the retry/fallback orchestrator. Most of its fields
//! drive the orchestrator's own loop; the classifier only reads the two override
//! lists, which widen the retry and fallback verdicts of the static taxonomy.
//!
//! Configurations can be built in code or loaded from a TOML file, with
//! environment variable overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::error::ErrorCode;

/// Prefix for environment variable overrides (e.g. `FAILSAFE__MAX_RETRIES`).
pub const ENV_PREFIX: &str = "FAILSAFE";

/// Errors that can occur when loading a retry configuration.
#[derive(Debug, Error)]
pub enum RetryConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The path could not be represented as UTF-8.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// The configuration could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
}

/// Retry and fallback settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum retry attempts per provider.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound on any retry delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor between consecutive delays.
    pub backoff_multiplier: f64,
    /// Codes that trigger a fallback even when the taxonomy says otherwise.
    pub fallback_on_errors: HashSet<ErrorCode>,
    /// Code strings that are retried even when the taxonomy says otherwise.
    ///
    /// Loosely typed so callers can list their own custom codes.
    pub retryable_errors: HashSet<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
            fallback_on_errors: HashSet::new(),
            retryable_errors: HashSet::new(),
        }
    }
}

impl RetryConfig {
    /// Creates a configuration with default values and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial retry delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the maximum retry delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the backoff multiplier.
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Adds codes that should always trigger a fallback.
    pub fn with_fallback_on_errors(mut self, codes: impl IntoIterator<Item = ErrorCode>) -> Self {
        self.fallback_on_errors.extend(codes);
        self
    }

    /// Adds code strings that should always be retried.
    pub fn with_retryable_errors<S: Into<String>>(
        mut self,
        codes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.retryable_errors.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Returns the initial retry delay.
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Returns the maximum retry delay.
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Returns true if `code` is listed as always retryable.
    pub fn is_retry_override(&self, code: ErrorCode) -> bool {
        self.retryable_errors.contains(code.as_str())
    }

    /// Returns true if `code` is listed as always triggering a fallback.
    pub fn is_fallback_override(&self, code: ErrorCode) -> bool {
        self.fallback_on_errors.contains(&code)
    }

    /// Load a retry configuration from a TOML file.
    ///
    /// Values can be overridden with environment variables prefixed by
    /// `FAILSAFE` using `__` as separator (e.g. `FAILSAFE__MAX_RETRIES=5`).
    /// The override lists take comma-separated values
    /// (e.g. `FAILSAFE__RETRYABLE_ERRORS=QUOTA_EXCEEDED,INTERNAL_ERROR`).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file doesn't exist
    /// - The configuration file cannot be parsed
    /// - The path is invalid
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use failsafe::config::RetryConfig;
    ///
    /// let config = RetryConfig::load("failsafe.toml")?;
    /// # Ok::<(), failsafe::config::RetryConfigError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RetryConfigError> {
        let path = path.as_ref();

        let path_str = path
            .to_str()
            .ok_or_else(|| RetryConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(RetryConfigError::FileNotFound(path_str.to_string()));
        }

        let config = Config::builder()
            .add_source(File::with_name(path_str))
            // Environment overrides use double underscore as separator;
            // the override lists take comma-separated codes
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("retryable_errors")
                    .with_list_parse_key("fallback_on_errors")
                    .try_parsing(true),
            )
            .build()?;

        let retry_config: RetryConfig = config.try_deserialize()?;
        tracing::debug!(
            path = path_str,
            fallback_overrides = retry_config.fallback_on_errors.len(),
            retry_overrides = retry_config.retryable_errors.len(),
            "loaded retry configuration"
        );

        Ok(retry_config)
    }
}
