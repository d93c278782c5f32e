//! Stage prompts for the generation pipeline.
//!
//! One builder per pipeline stage, organized by phase:
//!
//! - [`research`] - the five research stages (orchestration through quality)
//! - [`writing`] - the six writing stages (planning through metadata)
//!
//! Builders take the topic plus whatever upstream output the stage declares
//! as context and return a ready-to-send [`StagePrompt`]. The runners treat
//! this module as data; prompt wording is not part of the pipeline's
//! contract.

pub mod research;
pub mod writing;

/// System and user message pair for one pipeline stage.
#[derive(Debug, Clone)]
pub struct StagePrompt {
    /// System prompt establishing the stage's role and constraints.
    pub system: String,
    /// User prompt with the stage-specific request.
    pub user: String,
}

impl StagePrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}
