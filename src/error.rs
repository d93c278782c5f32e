//! Error types for blogforge operations.
//!
//! Defines error types for the major subsystems:
//! - LLM API interactions
//! - Topic feed loading and selection
//! - Post and coverage persistence
//!
//! Pipeline-specific errors (`PipelineError`, `ConfigError`) live next to
//! the pipeline in [`crate::pipeline`].

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API base URL: LITELLM_API_BASE environment variable not set")]
    MissingApiBase,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading topic feeds or selecting a topic.
#[derive(Debug, Error)]
pub enum TopicError {
    #[error("No topic feeds found in '{0}'")]
    NoFeeds(String),

    #[error("All available topics have already been covered")]
    NothingToCover,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while persisting posts or coverage records.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreation {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
