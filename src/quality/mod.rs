//! Research quality scoring.
//!
//! Converts heuristic signals gathered from the research phase (code block
//! counts per channel, documentation length, version presence, and the
//! source validator's own verdict) into a letter grade plus critical-issue
//! and warning lists. The grade drives the orchestrator's gate and the
//! low-quality disclaimer.

mod scorer;
mod signals;

pub use scorer::{assess, Grade, QualityAssessment};
pub use signals::ResearchSignals;
