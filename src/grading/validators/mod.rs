//! Answer validators, one per exercise kind.
//!
//! Each kind defines its own matching rule and its own tolerance for
//! malformed input (see the per-validator modules). Validators are
//! stateless and selected by the exercise's type tag through
//! [`validator_for`], so adding a kind means adding a variant and a
//! validator, not growing a conditional chain.

pub mod fill_blank;
pub mod matching;
pub mod selection;
pub mod true_false;
pub mod writing;

use serde_json::Value;

use crate::config::GradingConfig;
use crate::core::{Exercise, ExerciseKind};
use crate::error::{EngineError, Result};

pub use fill_blank::FillBlankValidator;
pub use matching::MatchingValidator;
pub use selection::SelectionValidator;
pub use true_false::TrueFalseValidator;
pub use writing::WritingValidator;

/// Result of validating a submission against an answer specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Sub-item match counts for keyed exercise kinds.
    Matched {
        /// Correctly matched sub-items.
        matched: u32,
        /// Total sub-items in the correct-answer spec.
        total: u32,
    },
    /// Word-count measurement for writing exercises.
    WordCount {
        /// Words in the submission.
        words: u32,
        /// Configured minimum word threshold.
        min_words: u32,
    },
}

/// Validation strategy for one exercise kind.
pub trait AnswerValidator: Send + Sync {
    /// The kind this validator grades.
    fn kind(&self) -> ExerciseKind;

    /// Validate a submitted answer against the exercise's answer spec.
    fn validate(
        &self,
        exercise: &Exercise,
        submitted: &Value,
        config: &GradingConfig,
    ) -> Result<ValidationOutcome>;
}

static SELECTION: SelectionValidator = SelectionValidator;
static FILL_BLANK: FillBlankValidator = FillBlankValidator;
static TRUE_FALSE: TrueFalseValidator = TrueFalseValidator;
static MATCHING: MatchingValidator = MatchingValidator;
static WRITING: WritingValidator = WritingValidator;

/// Select the validator for an exercise kind.
pub fn validator_for(kind: ExerciseKind) -> &'static dyn AnswerValidator {
    match kind {
        ExerciseKind::Selection => &SELECTION,
        ExerciseKind::FillBlank => &FILL_BLANK,
        ExerciseKind::TrueFalse => &TRUE_FALSE,
        ExerciseKind::Matching => &MATCHING,
        ExerciseKind::Writing => &WRITING,
    }
}

/// Extract the `answers` array from an exercise's answer key.
///
/// Keyed kinds store their correct answers as `{"answers": [...]}`.
/// A missing or non-array `answers` field is a malformed answer spec.
pub(crate) fn key_answers<'a>(exercise: &'a Exercise) -> Result<&'a Vec<Value>> {
    exercise
        .answer_key
        .get("answers")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            EngineError::validation(
                exercise.kind.as_str(),
                "answer key is missing an answers array",
            )
        })
}
