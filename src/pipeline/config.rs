//! Pipeline configuration.
//!
//! Covers the LLM settings, the length thresholds the runners gate on, the
//! storage directories, and the execution strategy.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// How the orchestrator reacts to a tripped quality gate or an undersized
/// article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Hard-fail: abort on a grade-F gate or an article below the length
    /// threshold.
    Standard,
    /// Always publish: proceed past the gate with a disclaimer and a
    /// `quality-<grade>` tag, and fall back to a placeholder body if every
    /// writing stage comes up short. Releases research stage outputs at the
    /// phase boundary.
    #[default]
    Optimized,
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Strategy::Standard),
            "optimized" => Ok(Strategy::Optimized),
            other => Err(ConfigError::InvalidValue {
                key: "strategy".to_string(),
                message: format!("expected 'standard' or 'optimized', got '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Standard => f.write_str("standard"),
            Strategy::Optimized => f.write_str("optimized"),
        }
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    // LLM settings
    /// Model identifier sent with every stage request.
    pub model: String,
    /// Sampling temperature for all stages.
    pub temperature: f64,

    // Length thresholds
    /// Minimum character count for a publishable article body.
    pub min_body_chars: usize,
    /// Stage outputs shorter than this are treated as empty.
    pub min_stage_output_chars: usize,

    // Storage settings
    /// Directory the finished posts are written to.
    pub posts_dir: PathBuf,
    /// Directory holding the topic feeds and the coverage file.
    pub data_dir: PathBuf,

    /// Execution strategy.
    pub strategy: Strategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            min_body_chars: 800,
            min_stage_output_chars: 50,
            posts_dir: PathBuf::from("./_posts"),
            data_dir: PathBuf::from("./data"),
            strategy: Strategy::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LITELLM_DEFAULT_MODEL`: model identifier (default: gpt-4)
    /// - `BLOGFORGE_TEMPERATURE`: sampling temperature (default: 0.7)
    /// - `BLOGFORGE_MIN_BODY_CHARS`: publishable body length (default: 800)
    /// - `BLOGFORGE_POSTS_DIR`: posts directory (default: ./_posts)
    /// - `BLOGFORGE_DATA_DIR`: feeds/coverage directory (default: ./data)
    /// - `BLOGFORGE_STRATEGY`: `standard` or `optimized` (default: optimized)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LITELLM_DEFAULT_MODEL") {
            config.model = val;
        }

        if let Ok(val) = std::env::var("BLOGFORGE_TEMPERATURE") {
            config.temperature = parse_env_value(&val, "BLOGFORGE_TEMPERATURE")?;
        }

        if let Ok(val) = std::env::var("BLOGFORGE_MIN_BODY_CHARS") {
            config.min_body_chars = parse_env_value(&val, "BLOGFORGE_MIN_BODY_CHARS")?;
        }

        if let Ok(val) = std::env::var("BLOGFORGE_POSTS_DIR") {
            config.posts_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("BLOGFORGE_DATA_DIR") {
            config.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("BLOGFORGE_STRATEGY") {
            config.strategy = val.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.min_body_chars == 0 {
            return Err(ConfigError::ValidationFailed(
                "min_body_chars must be greater than 0".to_string(),
            ));
        }

        if self.min_stage_output_chars > self.min_body_chars {
            return Err(ConfigError::ValidationFailed(
                "min_stage_output_chars cannot exceed min_body_chars".to_string(),
            ));
        }

        Ok(())
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the execution strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the posts directory.
    pub fn with_posts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.posts_dir = dir.into();
        self
    }

    /// Sets the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

fn parse_env_value<T: FromStr>(val: &str, key: &str) -> Result<T, ConfigError> {
    val.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{val}'"),
    })
}
