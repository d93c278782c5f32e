//! End-to-end pipeline tests against a scripted LLM provider.
//!
//! A full run consumes eleven responses: five research stages
//! (orchestration, readme, health, web, quality) followed by six writing
//! stages (planning, writing, validation, fixing, editing, metadata).

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use blogforge::error::LlmError;
use blogforge::llm::{Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage};
use blogforge::pipeline::{PipelineConfig, PipelineError, PipelineOrchestrator, Strategy};
use blogforge::quality::Grade;
use blogforge::topic::{Topic, TopicKind};

/// Mock LLM provider that returns predetermined responses.
struct MockLlmProvider {
    responses: Mutex<Vec<String>>,
    call_count: Arc<AtomicUsize>,
}

impl MockLlmProvider {
    fn new(responses: Vec<String>) -> (Self, Arc<AtomicUsize>) {
        let call_count = Arc::new(AtomicUsize::new(0));
        (
            Self {
                responses: Mutex::new(responses),
                call_count: Arc::clone(&call_count),
            },
            call_count,
        )
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().expect("lock not poisoned");
        let content = responses.get(idx).cloned().unwrap_or_default();

        Ok(GenerationResponse {
            id: format!("mock-{idx}"),
            model: "mock-model".to_string(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant(content),
                finish_reason: "stop".to_string(),
            }],
            usage: Usage {
                prompt_tokens: 100,
                completion_tokens: 50,
                total_tokens: 150,
            },
        })
    }
}

fn test_topic() -> Topic {
    Topic {
        kind: TopicKind::Package,
        id: "polars".to_string(),
        title: "Polars".to_string(),
        url: Some("https://pypi.org/project/polars/".to_string()),
        summary: Some("Blazingly fast DataFrames".to_string()),
        tags: vec!["python".to_string(), "dataframes".to_string()],
        version: 1,
    }
}

fn test_config(dir: &TempDir, strategy: Strategy) -> PipelineConfig {
    PipelineConfig::new()
        .with_model("mock-model")
        .with_strategy(strategy)
        .with_posts_dir(dir.path().join("posts"))
        .with_data_dir(dir.path().join("data"))
}

/// A filler paragraph of at least `chars` characters, tagged so tests can
/// tell which stage a body came from.
fn filler(marker: &str, chars: usize) -> String {
    let mut text = format!("## {marker}\n\n");
    let sentence = "This paragraph pads the article body out to a realistic length. ";
    while text.len() < chars {
        text.push_str(sentence);
    }
    text
}

/// An article body with one clean Python code block.
fn article(marker: &str, chars: usize) -> String {
    format!(
        "{}\n\n```python\nimport polars as pl\n\ndf = pl.DataFrame({{'a': [1, 2, 3]}})\nprint(df)\n```\n",
        filler(marker, chars)
    )
}

/// Research responses that earn grade A: five code blocks, a version
/// string, long documentation, and a clean validator verdict.
fn strong_research() -> Vec<String> {
    let code = "```python\nimport polars as pl\nprint(pl.__version__)\n```\n";
    vec![
        format!("Strategy: README-first\nConfidence: High\n{}", "x".repeat(60)),
        format!(
            "README analysis for Polars v1.2.3.\n{}{}{}\n{}",
            code,
            code,
            code,
            "Detailed installation and usage documentation. ".repeat(10),
        ),
        format!(
            "Package health: latest version 1.2.3, actively maintained.\n{}\n{}",
            code,
            "No deprecations found in the current release series. ".repeat(5),
        ),
        format!(
            "Web research found current tutorials.\n{}\n{}",
            code,
            "Multiple reliable sources corroborate the README. ".repeat(5),
        ),
        "Quality Rating: A\nConfidence: High\nVersion info: yes\nCode examples: 5 found"
            .to_string(),
    ]
}

/// Writing responses where the fixing stage produces the final article.
fn strong_writing() -> Vec<String> {
    vec![
        filler("Outline", 300),
        article("Draft", 1200),
        format!("Validation Result: PASS\nCode Blocks Checked: 1\n{}", "x".repeat(20)),
        article("Fixed", 1200),
        article("Edited", 1200),
        r#"{"title": "Polars in Practice", "excerpt": "Hands-on with Polars", "tags": ["python", "polars", "dataframes"]}"#.to_string(),
    ]
}

fn responses(research: Vec<String>, writing: Vec<String>) -> Vec<String> {
    research.into_iter().chain(writing).collect()
}

#[tokio::test]
async fn optimized_run_publishes_and_records_coverage() {
    let dir = TempDir::new().unwrap();
    let (provider, calls) = MockLlmProvider::new(responses(strong_research(), strong_writing()));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run_topic(&test_topic()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 11);
    assert_eq!(outcome.grade, Grade::A);
    assert!(outcome.filename.ends_with("-package-polars.md"));

    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(content.contains("title: \"Polars in Practice\""));
    assert!(content.contains("## Fixed"));
    assert!(!content.contains("> **Note:**"));
    assert!(!content.contains("quality-"));

    let coverage = fs::read_to_string(dir.path().join("data/coverage.json")).unwrap();
    assert!(coverage.contains("\"polars\""));
}

#[tokio::test]
async fn two_web_blocks_score_c_and_publish_without_disclaimer() {
    // Empty readme and health channels; the web channel alone carries two
    // code blocks and enough documentation.
    let code = "```python\nimport polars as pl\nprint(pl.read_csv)\n```\n";
    let research = vec![
        format!("Strategy: Web search\nConfidence: Medium\n{}", "x".repeat(60)),
        "short".to_string(),
        "short".to_string(),
        format!(
            "Web research report.\n{}{}\n{}",
            code,
            code,
            "Tutorial coverage corroborated across several sources. ".repeat(20),
        ),
        "Quality Rating: B\nConfidence: Medium\nCode examples: 2 found".to_string(),
    ];

    let dir = TempDir::new().unwrap();
    let (provider, _) = MockLlmProvider::new(responses(research, strong_writing()));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run_topic(&test_topic()).await.unwrap();
    assert_eq!(outcome.grade, Grade::C);

    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(!content.contains("> **Note:**"));
    assert!(!content.contains("quality-c"));
}

/// Research with no code anywhere rates F.
fn codeless_research() -> Vec<String> {
    vec![
        format!("Strategy: Web search\nConfidence: Low\n{}", "x".repeat(60)),
        format!(
            "README analysis: no code examples found. NO_CODE_EXAMPLES_FOUND. {}",
            "Prose-only documentation with plenty of words. ".repeat(10),
        ),
        format!(
            "Package health report without runnable examples. {}",
            "Maintenance looks fine but nothing is demonstrable. ".repeat(10),
        ),
        format!(
            "Web research found only marketing pages. {}",
            "No tutorials with code were located anywhere. ".repeat(10),
        ),
        "Quality Rating: F\nConfidence: Low\nRecommendation: ABORT".to_string(),
    ]
}

#[tokio::test]
async fn standard_strategy_aborts_on_grade_f_before_writing() {
    let dir = TempDir::new().unwrap();
    let (provider, calls) = MockLlmProvider::new(codeless_research());
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Standard), Box::new(provider));

    let err = orchestrator.run_topic(&test_topic()).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::QualityGate { grade: Grade::F, .. }
    ));
    // Only the five research stages ran.
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert!(!dir.path().join("posts").exists());
}

#[tokio::test]
async fn optimized_strategy_publishes_grade_f_with_disclaimer_and_tag() {
    let dir = TempDir::new().unwrap();
    let (provider, calls) =
        MockLlmProvider::new(responses(codeless_research(), strong_writing()));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run_topic(&test_topic()).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 11);
    assert_eq!(outcome.grade, Grade::F);

    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(content.contains("> **Note:**"));
    assert!(content.contains("quality grade F"));
    assert!(content.contains("\n  - quality-f"));
    // The disclaimer sits above the article body.
    let note = content.find("> **Note:**").unwrap();
    let body = content.find("## Fixed").unwrap();
    assert!(note < body);
}

#[tokio::test]
async fn short_fixing_output_falls_back_to_writing_stage() {
    let writing = vec![
        filler("Outline", 300),
        article("Draft", 1500),
        format!("Validation Result: FAIL\nBlock 1: issues\n{}", "x".repeat(20)),
        filler("Fixed", 200),
        filler("Edited", 300),
        r#"{"title": "Polars", "excerpt": "ok", "tags": ["python"]}"#.to_string(),
    ];

    let dir = TempDir::new().unwrap();
    let (provider, _) = MockLlmProvider::new(responses(strong_research(), writing));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run_topic(&test_topic()).await.unwrap();
    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(content.contains("## Draft"));
    assert!(!content.contains("## Fixed"));
}

#[tokio::test]
async fn non_json_metadata_synthesizes_defaults_from_topic() {
    let mut writing = strong_writing();
    writing[5] = "I am unable to produce the requested metadata right now, apologies.".to_string();

    let dir = TempDir::new().unwrap();
    let (provider, _) = MockLlmProvider::new(responses(strong_research(), writing));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run_topic(&test_topic()).await.unwrap();
    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(content.contains("title: \"Polars\""));
    assert!(content.contains("excerpt: \"Blazingly fast DataFrames\""));
    assert!(content.contains("\n  - dataframes"));
}

#[tokio::test]
async fn all_empty_research_is_fatal_in_both_strategies() {
    for strategy in [Strategy::Standard, Strategy::Optimized] {
        let dir = TempDir::new().unwrap();
        // Every stage output is below the minimum useful length.
        let (provider, calls) = MockLlmProvider::new(vec!["nope".to_string(); 5]);
        let orchestrator =
            PipelineOrchestrator::new(test_config(&dir, strategy), Box::new(provider));

        let err = orchestrator.run_topic(&test_topic()).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoResearchOutput));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}

#[tokio::test]
async fn standard_strategy_aborts_when_every_body_candidate_is_short() {
    let writing = vec![
        filler("Outline", 300),
        filler("Draft", 400),
        "Validation Result: PASS, everything in order across the board.".to_string(),
        filler("Fixed", 300),
        filler("Edited", 200),
        r#"{"title": "Polars"}"#.to_string(),
    ];

    let dir = TempDir::new().unwrap();
    let (provider, _) = MockLlmProvider::new(responses(strong_research(), writing));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Standard), Box::new(provider));

    let err = orchestrator.run_topic(&test_topic()).await.unwrap_err();
    assert!(matches!(err, PipelineError::InsufficientBody { .. }));
}

#[tokio::test]
async fn optimized_strategy_substitutes_placeholder_body() {
    let writing = vec![
        filler("Outline", 300),
        filler("Draft", 400),
        "Validation Result: PASS, everything in order across the board.".to_string(),
        filler("Fixed", 300),
        filler("Edited", 200),
        r#"{"title": "Polars", "excerpt": "ok", "tags": ["python"]}"#.to_string(),
    ];

    let dir = TempDir::new().unwrap();
    let (provider, _) = MockLlmProvider::new(responses(strong_research(), writing));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run_topic(&test_topic()).await.unwrap();
    let content = fs::read_to_string(&outcome.path).unwrap();
    assert!(content.contains("A full article could not be generated"));
}

#[tokio::test]
async fn run_selects_topic_from_feeds_and_skips_covered() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        data_dir.join("packages.json"),
        r#"{"packages": [{"name": "ruff", "summary": "Fast linter"}, {"name": "uv", "summary": "Fast installer"}]}"#,
    )
    .unwrap();
    // ruff is already covered; the run must pick uv.
    fs::write(
        data_dir.join("coverage.json"),
        r#"[{"kind": "package", "id": "ruff", "version": 1, "date": "2026-08-01", "filename": "old.md"}]"#,
    )
    .unwrap();

    let (provider, _) = MockLlmProvider::new(responses(strong_research(), strong_writing()));
    let orchestrator =
        PipelineOrchestrator::new(test_config(&dir, Strategy::Optimized), Box::new(provider));

    let outcome = orchestrator.run().await.unwrap();
    assert_eq!(outcome.topic.id, "uv");

    let coverage = fs::read_to_string(data_dir.join("coverage.json")).unwrap();
    assert!(coverage.contains("\"ruff\""));
    assert!(coverage.contains("\"uv\""));
}
