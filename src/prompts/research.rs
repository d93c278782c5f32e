//! Prompts for the research phase stages.

use crate::topic::{ResearchTarget, Topic};

use super::StagePrompt;

const RESEARCH_SYSTEM: &str = "You are part of a technical research team gathering verified, \
current information about software projects for a programming blog. Report only what the \
provided sources actually contain. Never invent code examples, version numbers, or APIs.";

fn target_label(target: ResearchTarget) -> &'static str {
    match target {
        ResearchTarget::Package => "package",
        ResearchTarget::Repo => "repo",
        ResearchTarget::General => "general",
    }
}

/// Stage 1: decide the research strategy and summarize expectations.
pub fn build_orchestration_prompt(
    topic: &Topic,
    target: ResearchTarget,
    identifier: &str,
) -> StagePrompt {
    let user = format!(
        "Analyze this topic and determine the research strategy.\n\
         \n\
         Topic: {title}\n\
         Topic type: {target}\n\
         Identifier: {identifier}\n\
         \n\
         Decide: README-first for packages and repositories, web search otherwise, \
         hybrid when official docs look thin. Always plan a final quality validation.\n\
         \n\
         OUTPUT FORMAT:\n\
         Strategy: [README-first / Web search / Hybrid]\n\
         Confidence: [High / Medium / Low]\n\
         Sources Used: [README, Package Health, Web]\n\
         Quality Rating: [A+ / A / B / C]\n\
         \n\
         Research Summary:\n\
         [key expectations]\n\
         \n\
         Recommendations:\n\
         - Version to use: [X.Y.Z]\n\
         - Features to avoid: [deprecated items]\n\
         - Code examples available: [count]",
        title = topic.title,
        target = target_label(target),
    );
    StagePrompt::new(RESEARCH_SYSTEM, user)
}

/// Stage 2: extract documentation, version info, and code from the README.
pub fn build_readme_prompt(identifier: &str) -> StagePrompt {
    let user = format!(
        "Extract complete information from the README for: {identifier}\n\
         \n\
         Report:\n\
         1. Version information: current version, language requirements, dependencies.\n\
         2. Installation: the exact install command.\n\
         3. Code examples: copy code blocks EXACTLY as they appear in the README, \
         fenced as ```python. If the README contains no code, output NO_CODE_EXAMPLES_FOUND. \
         Do not invent or adapt examples.\n\
         4. Features: main capabilities and use cases.\n\
         5. Warnings: deprecation notices or known issues."
    );
    StagePrompt::new(RESEARCH_SYSTEM, user)
}

/// Stage 3: validate package health; sees the readme stage's output.
pub fn build_health_prompt(identifier: &str, readme_output: &str) -> StagePrompt {
    let user = format!(
        "Validate package health for: {identifier}\n\
         \n\
         README ANALYSIS (from previous stage):\n\
         {readme_output}\n\
         \n\
         Report:\n\
         1. Version validation: latest version X.Y.Z, language requirements, last release date.\n\
         2. Deprecation check: deprecated or removed features, migration notes.\n\
         3. Code examples: how many usable examples the sources carry, fenced as ```python.\n\
         4. Maintenance status: active development, last activity, community support."
    );
    StagePrompt::new(RESEARCH_SYSTEM, user)
}

/// Stage 4: web research fallback.
pub fn build_web_prompt(topic: &Topic) -> StagePrompt {
    let user = format!(
        "Research \"{title}\" from public web sources (fallback mode).\n\
         \n\
         Cover: official documentation, recent tutorials, working examples, and the \
         current version. For each finding note the source URL and its reliability. \
         Include complete code examples fenced as ```python only when a source \
         actually provides them; flag incomplete ones.\n\
         \n\
         OUTPUT: web research report with sources cited.",
        title = topic.title,
    );
    StagePrompt::new(RESEARCH_SYSTEM, user)
}

/// Stage 5: rate source quality; sees all four earlier outputs.
pub fn build_quality_prompt(
    topic: &Topic,
    orchestration: &str,
    readme: &str,
    health: &str,
    web: &str,
) -> StagePrompt {
    let user = format!(
        "Validate the research quality for \"{title}\" and assign a confidence rating.\n\
         \n\
         STRATEGY:\n{orchestration}\n\
         \n\
         README ANALYSIS:\n{readme}\n\
         \n\
         PACKAGE HEALTH:\n{health}\n\
         \n\
         WEB RESEARCH:\n{web}\n\
         \n\
         Rate the sources: README/official docs rate A+, package health reports A, \
         web tutorials B, missing or incomplete research rates F. If the research is \
         unusable, state ABORT explicitly.\n\
         \n\
         OUTPUT FORMAT (keep the headings):\n\
         Quality Rating: [A+ / A / B / C / F]\n\
         Confidence: [High / Medium / Low]\n\
         \n\
         Completeness:\n\
         - Version info: [yes / no]\n\
         - Code examples: [count] found\n\
         - Deprecations: [yes / no]\n\
         \n\
         Recommendations:\n\
         [how to use this research in the article]",
        title = topic.title,
    );
    StagePrompt::new(RESEARCH_SYSTEM, user)
}
