//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error(
        "Descent gate thresholds inverted: on_threshold ({0}) must exceed off_threshold ({1})"
    )]
    InvertedHysteresis(f64, f64),

    #[error("Descent gate weights must be positive")]
    NonPositiveWeights,

    #[error("Anchor history cap cannot be 0")]
    ZeroHistoryCap,

    #[error("Promotion min_repeats cannot be 0")]
    ZeroMinRepeats,
}

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `.tiller/config.yaml` (project config)
    /// 3. `.tiller/local.yaml` (local overrides, optional)
    /// 4. Environment variables (`TILLER_` prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".tiller/config.yaml"))
            .merge(Yaml::file(".tiller/local.yaml"))
            .merge(Env::prefixed("TILLER_").split("__"))
            .extract()
            .context("failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate a loaded configuration.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ConfigError::InvalidLogLevel(other.to_string())),
        }

        match config.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        }

        if config.descent.on_threshold <= config.descent.off_threshold {
            return Err(ConfigError::InvertedHysteresis(
                config.descent.on_threshold,
                config.descent.off_threshold,
            ));
        }

        if config.descent.code_weight <= 0.0
            || config.descent.acceptance_weight <= 0.0
            || config.descent.depth_weight <= 0.0
        {
            return Err(ConfigError::NonPositiveWeights);
        }

        if config.anchor.history_cap == 0 {
            return Err(ConfigError::ZeroHistoryCap);
        }

        if config.promotion.min_repeats == 0 {
            return Err(ConfigError::ZeroMinRepeats);
        }

        Ok(())
    }
}
