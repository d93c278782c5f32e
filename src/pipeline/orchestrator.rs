//! Pipeline orchestrator.
//!
//! Sequences topic selection, the research phase, the quality gate, the
//! writing phase, and persistence. The configured [`Strategy`] decides how
//! gate failures and undersized articles are handled; everything else is
//! identical between the two strategies.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use crate::llm::LlmProvider;
use crate::post::{build_post, PostStore};
use crate::quality::{assess, Grade, QualityAssessment, ResearchSignals};
use crate::topic::{Topic, TopicStore};
use crate::validation::validate_article;

use super::research::ResearchRunner;
use super::writing::{parse_metadata, WritingRunner};
use super::{PipelineConfig, PipelineError, Strategy};

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Topic the post was generated for.
    pub topic: Topic,
    /// Quality grade the research earned.
    pub grade: Grade,
    /// Filename the post was saved under.
    pub filename: String,
    /// Full path of the saved post.
    pub path: PathBuf,
    /// Length of the final article body.
    pub body_chars: usize,
}

/// Coordinates one full generation run.
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    provider: Box<dyn LlmProvider>,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig, provider: Box<dyn LlmProvider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Select the next uncovered topic and generate a post for it.
    pub async fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        let topic_store = TopicStore::new(&self.config.data_dir);
        let post_store = PostStore::new(&self.config.posts_dir, &self.config.data_dir);
        let topic = topic_store.select_next(&post_store.load_coverage())?;
        self.run_topic(&topic).await
    }

    /// Generate a post for a specific topic.
    pub async fn run_topic(&self, topic: &Topic) -> Result<PipelineOutcome, PipelineError> {
        info!(
            strategy = %self.config.strategy,
            topic = %topic.title,
            kind = %topic.kind,
            "pipeline run starting"
        );

        // Phase 1: research.
        let research = ResearchRunner::new(self.provider.as_ref(), &self.config)
            .run(topic)
            .await?;

        let signals = ResearchSignals::derive(
            &research.readme,
            &research.health,
            &research.web,
            &research.quality,
        );
        let assessment = assess(&signals);
        let grade = assessment.score;

        info!(grade = %grade, "research quality assessed");
        for issue in &assessment.critical_issues {
            warn!(issue = %issue, "critical research issue");
        }
        for warning in &assessment.warnings {
            info!(warning = %warning, "research warning");
        }

        // The gate trips on grade F in both strategies; only the reaction
        // differs.
        if grade == Grade::F && self.config.strategy == Strategy::Standard {
            return Err(PipelineError::QualityGate {
                grade,
                reason: assessment.critical_issues.join("; "),
            });
        }

        let research_context = research.context_string(topic, &assessment);
        if self.config.strategy == Strategy::Optimized {
            // Phase boundary: only the derived context string travels into
            // the writing phase.
            drop(research);
            info!("released research stage outputs, retained context string");
        }

        // Phase 2: writing.
        let writing = WritingRunner::new(self.provider.as_ref(), &self.config)
            .run(topic, &research_context)
            .await?;

        let mut body = match writing.resolve_body(self.config.min_body_chars) {
            Some(body) => body.to_string(),
            None => match self.config.strategy {
                Strategy::Standard => {
                    return Err(PipelineError::InsufficientBody {
                        chars: writing.longest_candidate(),
                        min_chars: self.config.min_body_chars,
                    });
                }
                Strategy::Optimized => {
                    warn!("no writing stage met the length threshold, using placeholder body");
                    placeholder_body(topic)
                }
            },
        };

        let mut meta = parse_metadata(&writing.metadata, topic);

        if self.config.strategy == Strategy::Optimized && grade <= Grade::D {
            body = format!("{}\n\n{}", low_quality_disclaimer(&assessment), body);
            meta.tags.push(format!("quality-{}", grade.tag_suffix()));
            warn!(grade = %grade, "publishing with low-quality disclaimer");
        }

        // Last-mile integrity check. Findings are logged only; there is no
        // second fixing cycle.
        let report = validate_article(&body);
        if !report.all_valid {
            warn!("final article has code validation issues:");
            for issue in report.issues.iter().take(5) {
                warn!(issue = %issue, "validator finding");
            }
        }
        info!(code_blocks = report.code_blocks.len(), "final article validated");

        // Persist.
        let post_store = PostStore::new(&self.config.posts_dir, &self.config.data_dir);
        let (filename, content) = build_post(Utc::now(), topic, &body, &meta);
        let path = post_store.save(&filename, &content)?;
        let saved_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&filename)
            .to_string();
        post_store.record_coverage(topic, &saved_name)?;

        info!(path = %path.display(), grade = %grade, "pipeline run complete");
        Ok(PipelineOutcome {
            topic: topic.clone(),
            grade,
            filename: saved_name,
            path,
            body_chars: body.len(),
        })
    }
}

/// Minimal body published when every writing stage falls short under the
/// optimized strategy.
fn placeholder_body(topic: &Topic) -> String {
    let summary = topic.summary.as_deref().unwrap_or("");
    format!(
        "## {title}\n\n{summary}\n\nA full article could not be generated for this topic on \
         this run. Consult the official documentation for current usage and examples.",
        title = topic.title,
    )
}

/// Disclaimer prepended to the body when publishing grade D or F research.
fn low_quality_disclaimer(assessment: &QualityAssessment) -> String {
    format!(
        "> **Note:** This article was generated from limited source material (quality grade \
         {grade}). Verify code examples and version details against the official documentation.",
        grade = assessment.score,
    )
}
