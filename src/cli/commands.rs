//! CLI command definitions for blogforge.

use clap::Parser;
use tracing::{error, info};

use crate::llm::ChatClient;
use crate::pipeline::{PipelineConfig, PipelineError, PipelineOrchestrator, Strategy};

/// Quality-gated blog post generator.
#[derive(Parser)]
#[command(name = "blogforge")]
#[command(about = "Generate blog posts about trending packages with a quality-gated LLM pipeline")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate the next blog post from the topic feeds.
    #[command(alias = "gen")]
    Generate(GenerateArgs),
}

/// Arguments for the generate command.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Execution strategy: `standard` aborts on low-quality research,
    /// `optimized` always publishes and annotates the post instead.
    #[arg(long, env = "BLOGFORGE_STRATEGY")]
    pub strategy: Option<Strategy>,

    /// Model identifier sent with every stage request.
    #[arg(long, env = "LITELLM_DEFAULT_MODEL")]
    pub model: Option<String>,

    /// Directory holding the topic feeds and the coverage file.
    #[arg(long, env = "BLOGFORGE_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Directory the finished posts are written to.
    #[arg(long, env = "BLOGFORGE_POSTS_DIR")]
    pub posts_dir: Option<String>,
}

/// Parse CLI arguments without running a command.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse CLI arguments and execute the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Execute an already-parsed CLI invocation.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate_command(args).await,
    }
}

async fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = PipelineConfig::from_env()?;
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir.into();
    }
    if let Some(posts_dir) = args.posts_dir {
        config.posts_dir = posts_dir.into();
    }
    config.validate()?;

    let client = ChatClient::from_env()?;
    let orchestrator = PipelineOrchestrator::new(config, Box::new(client));

    match orchestrator.run().await {
        Ok(outcome) => {
            info!("blog post generated");
            info!("  topic:    {} ({})", outcome.topic.title, outcome.topic.kind);
            info!("  grade:    {}", outcome.grade);
            info!("  body:     {} chars", outcome.body_chars);
            info!("  saved to: {}", outcome.path.display());
            Ok(())
        }
        Err(e) => {
            error!("generation failed: {e}");
            match &e {
                PipelineError::NoResearchOutput => {
                    error!("  every research stage returned empty output");
                    error!("  check the LLM endpoint and the topic feeds");
                }
                PipelineError::QualityGate { reason, .. } => {
                    error!("  research quality below the publishable floor");
                    error!("  {reason}");
                    error!("  rerun with --strategy optimized to publish anyway");
                }
                PipelineError::InsufficientBody { chars, min_chars } => {
                    error!("  longest writing stage output was {chars} chars, need {min_chars}");
                }
                _ => {}
            }
            Err(e.into())
        }
    }
}
