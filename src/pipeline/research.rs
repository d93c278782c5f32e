//! Research phase runner.
//!
//! Executes the five research stages in their fixed order:
//! orchestration, readme, health, web, quality. Transitions are
//! unconditional; every run executes all five stages. Context flows only
//! where a stage declares it: health sees the readme output, and the final
//! quality stage sees everything before it.

use tracing::info;

use crate::llm::LlmProvider;
use crate::prompts::research as prompts;
use crate::quality::QualityAssessment;
use crate::topic::{detect_topic_type, Topic};

use super::{execute_stage, PipelineConfig, PipelineError};

/// Per-stage text produced by the research phase. An empty string means the
/// stage yielded nothing usable.
#[derive(Debug, Clone, Default)]
pub struct ResearchOutputs {
    pub orchestration: String,
    pub readme: String,
    pub health: String,
    pub web: String,
    pub quality: String,
}

impl ResearchOutputs {
    /// True when no stage returned any usable text.
    pub fn is_empty(&self) -> bool {
        self.orchestration.is_empty()
            && self.readme.is_empty()
            && self.health.is_empty()
            && self.web.is_empty()
            && self.quality.is_empty()
    }

    /// Combine the stage outputs and the quality assessment into the single
    /// context string the writing phase consumes.
    pub fn context_string(&self, topic: &Topic, assessment: &QualityAssessment) -> String {
        format!(
            "# RESEARCH CONTEXT: {title}\n\
             \n\
             ## Strategy & Orchestration\n{orchestration}\n\
             \n\
             ## README Analysis\n{readme}\n\
             \n\
             ## Package Health Validation\n{health}\n\
             \n\
             ## Web Research (Fallback)\n{web}\n\
             \n\
             ## Source Quality Rating\n{quality}\n\
             \n\
             ## Quality Assessment\n{assessment}\n\
             ---\n\
             END OF RESEARCH CONTEXT\n",
            title = topic.title,
            orchestration = self.orchestration,
            readme = self.readme,
            health = self.health,
            web = self.web,
            quality = self.quality,
            assessment = assessment.to_context_block(),
        )
    }
}

/// Runs the research phase against an LLM provider.
pub struct ResearchRunner<'a> {
    provider: &'a dyn LlmProvider,
    config: &'a PipelineConfig,
}

impl<'a> ResearchRunner<'a> {
    pub fn new(provider: &'a dyn LlmProvider, config: &'a PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// Execute all five research stages for a topic.
    ///
    /// Individually empty stage outputs are tolerated; they surface later as
    /// quality signals. A run in which every stage comes back empty is fatal.
    pub async fn run(&self, topic: &Topic) -> Result<ResearchOutputs, PipelineError> {
        let (target, identifier) = detect_topic_type(topic);
        info!(topic = %topic.title, identifier = %identifier, "starting research phase");

        let orchestration = execute_stage(
            self.provider,
            self.config,
            "orchestration",
            prompts::build_orchestration_prompt(topic, target, &identifier),
        )
        .await?;

        let readme = execute_stage(
            self.provider,
            self.config,
            "readme",
            prompts::build_readme_prompt(&identifier),
        )
        .await?;

        let health = execute_stage(
            self.provider,
            self.config,
            "health",
            prompts::build_health_prompt(&identifier, &readme),
        )
        .await?;

        let web = execute_stage(
            self.provider,
            self.config,
            "web",
            prompts::build_web_prompt(topic),
        )
        .await?;

        let quality = execute_stage(
            self.provider,
            self.config,
            "quality",
            prompts::build_quality_prompt(topic, &orchestration, &readme, &health, &web),
        )
        .await?;

        let outputs = ResearchOutputs {
            orchestration,
            readme,
            health,
            web,
            quality,
        };

        if outputs.is_empty() {
            return Err(PipelineError::NoResearchOutput);
        }

        info!("research phase complete");
        Ok(outputs)
    }
}
