//! Layered configuration for the civic task services.
//!
//! Sources, highest priority last:
//!
//! 1. Built-in defaults
//! 2. `civic.toml` in the working directory, when present
//! 3. Environment variables prefixed `CIVIC_`, with `__` separating nested
//!    sections (`CIVIC_DATABASE__URL` maps to `database.url`)

use crate::task::services::DEFAULT_MAX_SAVE_ATTEMPTS;
use crate::volunteer::services::DEFAULT_POINTS_PER_COMPLETION;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// File name of the optional configuration file.
pub const CONFIG_FILE: &str = "civic.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CIVIC_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge failure.
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),
    /// A field holds a value outside its accepted range.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivicConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Task lifecycle tuning.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL. `None` means only in-memory adapters are usable.
    #[serde(default)]
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Task lifecycle tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Attempts per mutation before a version conflict is surfaced.
    pub max_save_attempts: u32,
    /// Points credited to a volunteer per completed task.
    pub points_per_completion: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            max_save_attempts: DEFAULT_MAX_SAVE_ATTEMPTS,
            points_per_completion: DEFAULT_POINTS_PER_COMPLETION,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `CIVIC_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

impl CivicConfig {
    /// Builds the provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if Path::new(CONFIG_FILE).exists() {
            figment = figment.merge(Toml::file(CONFIG_FILE));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads and validates configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed and
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extracts and validates configuration from an explicit figment.
    ///
    /// # Errors
    ///
    /// See [`CivicConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self
            .database
            .url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "database.url",
                reason: "must not be blank".to_owned(),
            });
        }
        if self.lifecycle.max_save_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lifecycle.max_save_attempts",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: "must not be blank".to_owned(),
            });
        }
        Ok(())
    }
}
