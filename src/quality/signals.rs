//! Signal derivation from raw research output text.

use regex::Regex;
use std::sync::OnceLock;

use crate::validation::extract_code_blocks;

use super::scorer::Grade;

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\bv\d+\.\d+(?:\.\d+)*\b|version\s*[:=]?\s*["']?\d+(?:\.\d+)+"#)
            .expect("Invalid version regex")
    })
}

fn rating_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*quality rating:\s*\[?\s*([A-F]\+?)").expect("Invalid rating regex")
    })
}

/// Heuristic signals extracted from the research phase outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchSignals {
    /// Python code blocks found in the readme channel.
    pub readme_blocks: usize,
    /// Python code blocks found in the health channel.
    pub health_blocks: usize,
    /// Python code blocks found in the web research channel.
    pub web_blocks: usize,
    /// Combined character length of the documentation channels.
    pub doc_chars: usize,
    /// Whether any channel carried a concrete version string.
    pub version_detected: bool,
    /// Whether the source validator recommended aborting or rated F.
    pub validator_abort: bool,
}

impl ResearchSignals {
    /// Derive signals from the three documentation channels plus the
    /// source validator's report text.
    pub fn derive(readme: &str, health: &str, web: &str, validator_report: &str) -> Self {
        let doc_chars = readme.len() + health.len() + web.len();
        let version_detected = [readme, health, web]
            .iter()
            .any(|text| version_regex().is_match(text));

        Self {
            readme_blocks: extract_code_blocks(readme).len(),
            health_blocks: extract_code_blocks(health).len(),
            web_blocks: extract_code_blocks(web).len(),
            doc_chars,
            version_detected,
            validator_abort: validator_recommends_abort(validator_report),
        }
    }
}

/// The validator report recommends aborting when it says ABORT outright or
/// rates the sources F.
fn validator_recommends_abort(report: &str) -> bool {
    if report.contains("ABORT") {
        return true;
    }
    rating_regex()
        .captures(report)
        .and_then(|cap| cap[1].parse::<Grade>().ok())
        .is_some_and(|grade| grade == Grade::F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_counts_blocks_per_channel() {
        let readme = "Docs\n```python\nprint(1)\n```\n```python\nprint(2)\n```\n";
        let health = "Health report, no code.";
        let web = "```python\nprint(3)\n```\n";
        let signals = ResearchSignals::derive(readme, health, web, "Quality Rating: A");

        assert_eq!(signals.readme_blocks, 2);
        assert_eq!(signals.health_blocks, 0);
        assert_eq!(signals.web_blocks, 1);
        assert_eq!(
            signals.doc_chars,
            readme.len() + health.len() + web.len()
        );
        assert!(!signals.validator_abort);
    }

    #[test]
    fn test_version_detection_forms() {
        assert!(ResearchSignals::derive("Latest release v2.14.0", "", "", "").version_detected);
        assert!(ResearchSignals::derive("", "version: 3.1", "", "").version_detected);
        assert!(ResearchSignals::derive("", "", "Version 1.0.3 shipped", "").version_detected);
        assert!(!ResearchSignals::derive("no numbers here", "", "", "").version_detected);
    }

    #[test]
    fn test_abort_detection() {
        assert!(validator_recommends_abort("Recommendation: ABORT, sources missing"));
        assert!(validator_recommends_abort("Quality Rating: F\nConfidence: Low"));
        assert!(validator_recommends_abort("Quality Rating: [F]"));
        assert!(!validator_recommends_abort("Quality Rating: A+\nConfidence: High"));
        assert!(!validator_recommends_abort("all good"));
    }
}
