//! The quality-gated two-phase generation pipeline.
//!
//! # Pipeline Flow
//!
//! 1. **Topic selection**: the next uncovered topic is picked from the feeds
//! 2. **Research phase**: five sequential stages gather and rate sources
//! 3. **Quality gate**: signals from the research outputs are scored into a
//!    letter grade; grade F trips the gate
//! 4. **Writing phase**: six sequential stages plan, write, validate, fix,
//!    edit, and tag the article
//! 5. **Persistence**: the post is written to disk and coverage recorded
//!
//! Stage execution is strictly sequential. Stages communicate only by
//! passing immutable text forward; there is no shared mutable state and no
//! retry loop.
//!
//! The [`Strategy`] decides what a tripped gate and an undersized article
//! mean: `Standard` aborts, `Optimized` always publishes and annotates the
//! post instead.

mod config;
mod orchestrator;
mod research;
mod writing;

pub use config::{ConfigError, PipelineConfig, Strategy};
pub use orchestrator::{PipelineOrchestrator, PipelineOutcome};
pub use research::{ResearchOutputs, ResearchRunner};
pub use writing::{parse_metadata, WritingOutputs, WritingRunner};

use thiserror::Error;
use tracing::warn;

use crate::error::{LlmError, StorageError, TopicError};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::StagePrompt;
use crate::quality::Grade;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every research stage came back empty; there is nothing to write from.
    #[error("Research phase produced no usable output")]
    NoResearchOutput,

    /// The research quality gate tripped under the standard strategy.
    #[error("Research quality gate failed with grade {grade}: {reason}")]
    QualityGate { grade: Grade, reason: String },

    /// No writing stage produced an article of the required length under
    /// the standard strategy.
    #[error("Final article too short: {chars} chars, need {min_chars}+")]
    InsufficientBody { chars: usize, min_chars: usize },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Topic selection error: {0}")]
    Topic(#[from] TopicError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Execute one pipeline stage against the LLM provider.
///
/// Transport and API failures are fatal and propagate. A response that is
/// missing content or shorter than the configured minimum is not: it is
/// logged and collapsed to an empty string, which downstream scoring treats
/// as a quality signal.
pub(crate) async fn execute_stage(
    provider: &dyn LlmProvider,
    config: &PipelineConfig,
    stage: &str,
    prompt: StagePrompt,
) -> Result<String, PipelineError> {
    let request = GenerationRequest::new(
        config.model.clone(),
        vec![Message::system(prompt.system), Message::user(prompt.user)],
    )
    .with_temperature(config.temperature);

    let response = provider.generate(request).await?;
    let content = response.first_content().unwrap_or_default().trim();

    if content.len() < config.min_stage_output_chars {
        warn!(
            stage,
            chars = content.len(),
            "stage output below minimum useful length, treating as empty"
        );
        return Ok(String::new());
    }

    Ok(content.to_string())
}
