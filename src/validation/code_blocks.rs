//! Fenced code block extraction and per-block checks.

use regex::Regex;
use std::sync::OnceLock;

use super::python;

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?si)```(?:python|py)[ \t]*\r?\n(.*?)```").expect("Invalid fence regex")
    })
}

fn shell_command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(pip|apt|brew|conda)\s+install").expect("Invalid shell command regex")
    })
}

fn placeholder_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"\.\.\.+", "Ellipsis placeholder"),
            (r"TODO", "TODO comment"),
            (r"FIXME", "FIXME comment"),
            (r"your_\w+", "Generic placeholder (your_X)"),
            (r"<[A-Z_]+>", "Template placeholder (<VAR>)"),
        ]
        .into_iter()
        .map(|(pattern, description)| {
            let re = Regex::new(pattern).expect("Invalid placeholder regex");
            (re, description)
        })
        .collect()
    })
}

/// Result of validating every Python code block in an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// True when no block produced any issue. Vacuously true with zero blocks.
    pub all_valid: bool,
    /// Issues in discovery order, grouped per block.
    pub issues: Vec<String>,
    /// Extracted block sources, in document order.
    pub code_blocks: Vec<String>,
}

/// Extract all fenced Python code blocks from markdown text.
///
/// Only fences explicitly tagged `python` or `py` (case-insensitive) count;
/// untagged fences and other languages are ignored.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    fence_regex()
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Run every static check against a single code block.
///
/// Returns the list of issues found; an empty list means the block is valid.
/// Empty blocks and syntax failures short-circuit: nothing else is reported
/// for a block that does not even hold parseable code.
pub fn validate_block(code: &str) -> Vec<String> {
    if code.trim().is_empty() {
        return vec!["Empty code block".to_string()];
    }

    if let Err(issue) = python::check_syntax(code) {
        return vec![issue.to_string()];
    }

    let mut issues = Vec::new();

    if shell_command_regex().is_match(code) {
        issues.push("Shell commands found in Python block".to_string());
    }

    for (pattern, description) in placeholder_patterns() {
        if pattern.is_match(code) {
            issues.push(format!("Contains {description}"));
        }
    }

    issues
}

/// Validate every Python code block in an article.
///
/// Empty blocks are skipped rather than counted as failures; an article with
/// no Python blocks at all is valid (whether code-free content is acceptable
/// is the quality scorer's call, not the validator's).
pub fn validate_article(text: &str) -> ValidationReport {
    let code_blocks = extract_code_blocks(text);
    let mut issues = Vec::new();
    let mut all_valid = true;

    for (n, code) in code_blocks.iter().enumerate() {
        if code.trim().is_empty() {
            continue;
        }
        let block_issues = validate_block(code);
        if !block_issues.is_empty() {
            all_valid = false;
            issues.push(format!("Block {}:", n + 1));
            for issue in block_issues {
                issues.push(format!("  - {issue}"));
            }
        }
    }

    ValidationReport {
        all_valid,
        issues,
        code_blocks,
    }
}
