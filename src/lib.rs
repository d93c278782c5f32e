//! # blogforge
//!
//! A quality-gated, two-phase LLM pipeline that generates blog posts about
//! trending packages, repositories, papers, and tutorials.
//!
//! ## Architecture
//!
//! - [`topic`] - topic selection from JSON data feeds with coverage tracking
//! - [`llm`] - chat-completion client and the [`llm::LlmProvider`] seam
//! - [`prompts`] - per-stage prompt builders for both phases
//! - [`pipeline`] - the research and writing phase runners plus the
//!   orchestrator with its standard/optimized strategies
//! - [`quality`] - heuristic scoring of research output into a letter grade
//! - [`validation`] - static checks over Python code blocks in articles
//! - [`post`] - post assembly, persistence, and coverage records
//! - [`cli`] - command-line interface
//!
//! ## Pipeline
//!
//! A run executes eleven LLM stages in a fixed sequence: five research
//! stages (orchestration, readme, health, web, quality), then a quality
//! gate, then six writing stages (planning, writing, validation, fixing,
//! editing, metadata). The research outputs are scored into a grade F..A;
//! the `standard` strategy aborts on F while the `optimized` strategy
//! always publishes, annotating low-quality posts with a disclaimer and a
//! `quality-<grade>` tag.

pub mod cli;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod post;
pub mod prompts;
pub mod quality;
pub mod topic;
pub mod validation;

pub use error::{LlmError, StorageError, TopicError};
pub use pipeline::{
    PipelineConfig, PipelineError, PipelineOrchestrator, PipelineOutcome, Strategy,
};
pub use quality::{assess, Grade, QualityAssessment, ResearchSignals};
pub use topic::{Topic, TopicKind, TopicStore};
pub use validation::{validate_article, ValidationReport};
