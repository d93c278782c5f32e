//! Letter-grade scoring over research signals.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::signals::ResearchSignals;

/// Letter grade for research quality, ordered worst to best.
///
/// `A+` is the top of the scale the source validator reports; the scorer
/// itself never awards better than `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
    APlus,
}

impl Grade {
    /// Lowercase letter form, used for the `quality-<grade>` tag.
    pub fn tag_suffix(&self) -> &'static str {
        match self {
            Grade::F => "f",
            Grade::D => "d",
            Grade::C => "c",
            Grade::B => "b",
            Grade::A => "a",
            Grade::APlus => "a-plus",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::F => "F",
            Grade::D => "D",
            Grade::C => "C",
            Grade::B => "B",
            Grade::A => "A",
            Grade::APlus => "A+",
        };
        f.write_str(s)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "F" => Ok(Grade::F),
            "D" => Ok(Grade::D),
            "C" => Ok(Grade::C),
            "B" => Ok(Grade::B),
            "A" => Ok(Grade::A),
            "A+" => Ok(Grade::APlus),
            other => Err(format!("unknown grade '{other}'")),
        }
    }
}

/// Deterministic assessment of the research phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityAssessment {
    /// Overall letter grade.
    pub score: Grade,
    /// Conditions that make the research unusable as-is.
    pub critical_issues: Vec<String>,
    /// Conditions that soften the grade without rejecting the research.
    pub warnings: Vec<String>,
}

impl QualityAssessment {
    /// Render the assessment as the block embedded in writing prompts.
    pub fn to_context_block(&self) -> String {
        let mut block = format!("Quality Assessment: {}\n", self.score);
        for issue in &self.critical_issues {
            block.push_str(&format!("CRITICAL: {issue}\n"));
        }
        for warning in &self.warnings {
            block.push_str(&format!("Warning: {warning}\n"));
        }
        block
    }
}

/// Thresholds for the documentation-completeness downgrade.
const DOC_CHARS_CRITICAL: usize = 500;
const DOC_CHARS_THIN: usize = 1000;

/// Compute the quality grade from research signals.
///
/// The rules are order-sensitive and only ever lower the grade. Code example
/// count sets the base grade; documentation length, version presence, and
/// the validator's abort verdict apply downgrades afterwards. `F` and `D`
/// are sticky floors that later rules never alter.
pub fn assess(signals: &ResearchSignals) -> QualityAssessment {
    let mut critical_issues = Vec::new();
    let mut warnings = Vec::new();

    let total_blocks = signals.readme_blocks + signals.health_blocks + signals.web_blocks;

    let mut score = match total_blocks {
        0 => {
            critical_issues.push("Zero code examples found in research output".to_string());
            Grade::F
        }
        1 => {
            warnings.push("Only 1 code example found, article depth will be limited".to_string());
            Grade::D
        }
        2 => {
            warnings.push("Moderate quality: only 2 code examples found".to_string());
            Grade::C
        }
        3 | 4 => {
            warnings.push(format!("Good coverage: {total_blocks} code examples found"));
            Grade::B
        }
        _ => Grade::A,
    };

    if signals.doc_chars < DOC_CHARS_CRITICAL {
        if score > Grade::F {
            score = Grade::D;
        }
        critical_issues.push(format!(
            "Documentation too short ({} chars, need {}+)",
            signals.doc_chars, DOC_CHARS_CRITICAL
        ));
    } else if signals.doc_chars < DOC_CHARS_THIN {
        if score == Grade::A {
            score = Grade::B;
        }
        warnings.push(format!(
            "Documentation thinner than ideal ({} chars)",
            signals.doc_chars
        ));
    }

    if !signals.version_detected && score > Grade::D {
        if score == Grade::A {
            score = Grade::B;
        }
        warnings.push("No version information detected in research".to_string());
    }

    if signals.validator_abort && score > Grade::D {
        if score == Grade::A {
            score = Grade::B;
        }
        warnings.push("Source validator recommended aborting".to_string());
    }

    QualityAssessment {
        score,
        critical_issues,
        warnings,
    }
}
