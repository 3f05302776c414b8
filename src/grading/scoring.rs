//! Proportional scoring of validation outcomes.
//!
//! Sub-item outcomes earn `round(matched / total * max_points)`, and an
//! attempt is correct when the score reaches the point ceiling. Writing
//! earns credit proportional to word count capped at the threshold, and
//! is correct only once the threshold itself is met, a word-count gate
//! rather than a score gate. Scores are clamped to the exercise's point
//! ceiling so rounding can never overshoot it.

use crate::error::{EngineError, Result};
use crate::grading::validators::ValidationOutcome;

/// A scored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    /// Points earned, in `0..=max_points`.
    pub score: u32,
    /// Whether the attempt fully satisfied the exercise.
    pub correct: bool,
}

/// Convert a validation outcome into points.
///
/// Returns an error for degenerate inputs (an empty answer spec or a
/// zero word threshold) rather than dividing by zero or silently
/// awarding full credit.
pub fn score_outcome(outcome: &ValidationOutcome, max_points: u32) -> Result<ScoreResult> {
    match *outcome {
        ValidationOutcome::Matched { matched, total } => {
            if total == 0 {
                return Err(EngineError::config(
                    "exercise has an empty answer spec and cannot be scored",
                ));
            }
            let score = proportion(matched, total, max_points);
            Ok(ScoreResult {
                score,
                correct: score == max_points,
            })
        }
        ValidationOutcome::WordCount { words, min_words } => {
            if min_words == 0 {
                return Err(EngineError::config(
                    "writing exercise has a zero word threshold and cannot be scored",
                ));
            }
            let score = proportion(words.min(min_words), min_words, max_points);
            Ok(ScoreResult {
                score,
                correct: words >= min_words,
            })
        }
    }
}

fn proportion(part: u32, whole: u32, max_points: u32) -> u32 {
    let raw = (f64::from(part) / f64::from(whole) * f64::from(max_points)).round();
    (raw as u32).min(max_points)
}
