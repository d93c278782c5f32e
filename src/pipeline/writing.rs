//! Writing phase runner.
//!
//! Executes the six writing stages in their fixed order: planning, writing,
//! validation, fixing, editing, metadata. Every stage receives the research
//! context plus its declared predecessor's output. The validation stage's
//! report is advisory text for the fixing stage; the static code validator
//! in [`crate::validation`] remains the only authoritative check.

use serde_json::Value;
use tracing::{info, warn};

use crate::llm::LlmProvider;
use crate::post::PostMeta;
use crate::prompts::writing as prompts;
use crate::topic::Topic;

use super::{execute_stage, PipelineConfig, PipelineError};

/// Per-stage text produced by the writing phase.
#[derive(Debug, Clone, Default)]
pub struct WritingOutputs {
    pub planning: String,
    pub writing: String,
    pub validation: String,
    pub fixing: String,
    pub editing: String,
    pub metadata: String,
}

impl WritingOutputs {
    /// Resolve the article body via the fallback chain: the fixing stage's
    /// output wins if long enough, then the writing stage's, then the
    /// editing stage's. Returns `None` when every candidate falls short.
    pub fn resolve_body(&self, min_chars: usize) -> Option<&str> {
        for (stage, candidate) in [
            ("fixing", &self.fixing),
            ("writing", &self.writing),
            ("editing", &self.editing),
        ] {
            if candidate.len() >= min_chars {
                info!(stage, chars = candidate.len(), "resolved article body");
                return Some(candidate);
            }
            warn!(stage, chars = candidate.len(), "stage output too short for body");
        }
        None
    }

    /// Longest candidate length, for diagnostics when resolution fails.
    pub fn longest_candidate(&self) -> usize {
        [&self.fixing, &self.writing, &self.editing]
            .into_iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
    }
}

/// Parse the metadata stage's output into post metadata.
///
/// The JSON object is located as the substring from the first `{` to the
/// last `}`. Any parse failure, and any individually missing field, falls
/// back to values synthesized from the topic. This never fails.
pub fn parse_metadata(raw: &str, topic: &Topic) -> PostMeta {
    let mut meta = PostMeta::fallback(topic);

    let start = raw.find('{');
    let end = raw.rfind('}');
    let parsed: Option<Value> = match (start, end) {
        (Some(start), Some(end)) if end > start => {
            serde_json::from_str(&raw[start..=end]).ok()
        }
        _ => None,
    };

    let Some(value) = parsed else {
        warn!("metadata stage output was not valid JSON, using topic defaults");
        return meta;
    };

    if let Some(title) = value.get("title").and_then(Value::as_str) {
        meta.title = title.to_string();
    }
    if let Some(excerpt) = value.get("excerpt").and_then(Value::as_str) {
        meta.excerpt = excerpt.to_string();
    }
    if let Some(tags) = value.get("tags").and_then(Value::as_array) {
        let tags: Vec<String> = tags
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        if !tags.is_empty() {
            meta.tags = tags;
        }
    }

    meta
}

/// Runs the writing phase against an LLM provider.
pub struct WritingRunner<'a> {
    provider: &'a dyn LlmProvider,
    config: &'a PipelineConfig,
}

impl<'a> WritingRunner<'a> {
    pub fn new(provider: &'a dyn LlmProvider, config: &'a PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// Execute all six writing stages for a topic.
    pub async fn run(
        &self,
        topic: &Topic,
        research_context: &str,
    ) -> Result<WritingOutputs, PipelineError> {
        info!(topic = %topic.title, "starting writing phase");

        let planning = execute_stage(
            self.provider,
            self.config,
            "planning",
            prompts::build_planning_prompt(topic, research_context),
        )
        .await?;

        let writing = execute_stage(
            self.provider,
            self.config,
            "writing",
            prompts::build_writing_prompt(topic, research_context, &planning),
        )
        .await?;

        let validation = execute_stage(
            self.provider,
            self.config,
            "validation",
            prompts::build_validation_prompt(research_context, &writing),
        )
        .await?;

        let fixing = execute_stage(
            self.provider,
            self.config,
            "fixing",
            prompts::build_fixing_prompt(research_context, &writing, &validation),
        )
        .await?;

        let editing = execute_stage(
            self.provider,
            self.config,
            "editing",
            prompts::build_editing_prompt(research_context, &fixing),
        )
        .await?;

        let metadata = execute_stage(
            self.provider,
            self.config,
            "metadata",
            prompts::build_metadata_prompt(topic, research_context, &editing),
        )
        .await?;

        info!("writing phase complete");
        Ok(WritingOutputs {
            planning,
            writing,
            validation,
            fixing,
            editing,
            metadata,
        })
    }
}
