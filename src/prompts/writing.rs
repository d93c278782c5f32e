//! Prompts for the writing phase stages.

use crate::topic::Topic;

use super::StagePrompt;

const WRITING_SYSTEM: &str = "You are part of an editorial team producing technical blog \
articles from a validated research context. Use only information from that context. Never \
invent libraries, versions, datasets, or APIs, and never mention being an AI.";

/// Stage 6: outline the article from the research context.
pub fn build_planning_prompt(topic: &Topic, research_context: &str) -> StagePrompt {
    let user = format!(
        "Create a detailed blog outline for: {title}\n\
         \n\
         Use the EXACT version number reported in the research context; never fall back \
         to older versions from memory.\n\
         \n\
         RESEARCH CONTEXT:\n{research_context}\n\
         \n\
         Structure the outline as: Introduction, Overview, Getting Started (installation \
         plus a complete quick example), Core Concepts, Practical Examples (at least two, \
         each with complete code), Best Practices, Conclusion. Note deprecated features \
         the article must avoid.",
        title = topic.title,
    );
    StagePrompt::new(WRITING_SYSTEM, user)
}

/// Stage 7: write the full article from the outline.
pub fn build_writing_prompt(topic: &Topic, research_context: &str, outline: &str) -> StagePrompt {
    let user = format!(
        "Write a Markdown blog article about: {title}\n\
         \n\
         RESEARCH CONTEXT:\n{research_context}\n\
         \n\
         OUTLINE (from previous stage):\n{outline}\n\
         \n\
         Formatting: use ## and ### headings only; never wrap the whole article in a \
         single code fence; use ```python only around Python examples.\n\
         Code: every block complete and runnable, imports at the top, all variables \
         defined, no placeholders like TODO, ..., or your_X.\n\
         Output: one Markdown article of roughly 1200 words, starting directly with a \
         heading. No preamble.",
        title = topic.title,
    );
    StagePrompt::new(WRITING_SYSTEM, user)
}

/// Stage 8: review the article's code blocks (advisory report).
pub fn build_validation_prompt(research_context: &str, article: &str) -> StagePrompt {
    let user = format!(
        "Validate ALL Python code blocks in the article below.\n\
         \n\
         RESEARCH CONTEXT:\n{research_context}\n\
         \n\
         ARTICLE:\n{article}\n\
         \n\
         For each block check: syntax; whether the imported symbols actually exist in \
         the library per the research context; missing imports; undefined variables; \
         placeholders (TODO, ..., your_X); deprecated APIs.\n\
         \n\
         OUTPUT FORMAT (plain text):\n\
         Validation Result: [PASS / FAIL]\n\
         Code Blocks Checked: [count]\n\
         Issues Found:\n\
         Block X:\n\
         - [issue description]\n\
         \n\
         If no issues, state clearly that all blocks passed."
    );
    StagePrompt::new(WRITING_SYSTEM, user)
}

/// Stage 9: fix the issues the validation stage reported.
pub fn build_fixing_prompt(
    research_context: &str,
    article: &str,
    validation_report: &str,
) -> StagePrompt {
    let user = format!(
        "Fix ALL code issues found by the validator.\n\
         \n\
         RESEARCH CONTEXT:\n{research_context}\n\
         \n\
         ARTICLE:\n{article}\n\
         \n\
         VALIDATION REPORT:\n{validation_report}\n\
         \n\
         Rules: if the report says PASS, return the article EXACTLY as-is. Otherwise fix \
         ONLY the reported problems: add missing imports, define undefined variables, \
         replace placeholders with working code, fix syntax, replace deprecated APIs per \
         the research context. Never switch libraries or change the article's structure.\n\
         \n\
         Return ONLY the complete corrected article body as raw Markdown. Do not wrap the \
         answer in a code fence and do not add any preamble or notes."
    );
    StagePrompt::new(WRITING_SYSTEM, user)
}

/// Stage 10: formatting-only polish.
pub fn build_editing_prompt(research_context: &str, article: &str) -> StagePrompt {
    let user = format!(
        "Apply minimal Markdown formatting to the article below. Adjust spacing and \
         Markdown syntax ONLY; every word, sentence, number, and code block must remain \
         exactly the same.\n\
         \n\
         RESEARCH CONTEXT (reference only, do not add content from it):\n{research_context}\n\
         \n\
         ARTICLE:\n{article}\n\
         \n\
         You may: normalize blank lines around headings and code fences, convert \
         bold-only headings to ## headings, and add an obvious language tag to untagged \
         fences. You must not: delete, add, or paraphrase text, or touch code inside \
         fences.\n\
         \n\
         The answer must start with a heading or paragraph from the article, must not \
         begin or end with a code fence, and must contain nothing but the article body."
    );
    StagePrompt::new(WRITING_SYSTEM, user)
}

/// Stage 11: SEO metadata as a JSON object.
pub fn build_metadata_prompt(topic: &Topic, research_context: &str, article: &str) -> StagePrompt {
    let user = format!(
        "Create SEO metadata for a blog article about: {title}\n\
         \n\
         RESEARCH CONTEXT:\n{research_context}\n\
         \n\
         FINAL ARTICLE:\n{article}\n\
         \n\
         Generate JSON:\n\
         {{\n\
           \"title\": \"Engaging title (70 chars max)\",\n\
           \"excerpt\": \"Compelling description (200 chars max)\",\n\
           \"tags\": [\"tag1\", \"tag2\", \"tag3\", \"tag4\"]\n\
         }}\n\
         \n\
         Tags: 4-8 relevant tags, lowercase, hyphenated, no spaces, directly tied to the \
         topic and its ecosystem. Do not mention unrelated tools.\n\
         \n\
         Output ONLY valid JSON. No preamble, no explanation, no extra text.",
        title = topic.title,
    );
    StagePrompt::new(WRITING_SYSTEM, user)
}
