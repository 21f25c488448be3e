use serde::Serialize;

use crate::interview::phase::{Phase, PHASE_COUNT};

/// Progress bar state derived from where the session is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// 0.0 – 1.0
    pub fraction: f64,
    /// Floor of `fraction * 100`.
    pub percent: u8,
    pub label: String,
}

/// Pure progress derivation.
///
/// Outside the assessment each phase counts as complete once entered. Inside
/// it, answered questions fill the assessment's slice of the bar.
pub fn compute_progress(phase: &Phase, answered: usize, total_questions: usize) -> Progress {
    let phases = PHASE_COUNT as f64;
    let index = phase.index() as f64;

    let (fraction, label) = match phase {
        Phase::TechnicalAssessment => {
            let within = if total_questions == 0 {
                0.0
            } else {
                answered.min(total_questions) as f64 / total_questions as f64
            };
            (
                index / phases + within / phases,
                format!(
                    "{} ({answered}/{total_questions})",
                    phase.friendly_name()
                ),
            )
        }
        _ => ((index + 1.0) / phases, phase.friendly_name().to_string()),
    };

    let fraction = fraction.clamp(0.0, 1.0);
    Progress {
        fraction,
        percent: (fraction * 100.0).floor() as u8,
        label,
    }
}
