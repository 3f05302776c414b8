//! Grading: answer validation and proportional scoring.

pub mod scoring;
pub mod validators;

pub use scoring::{score_outcome, ScoreResult};
pub use validators::{validator_for, AnswerValidator, ValidationOutcome};
