//! Selection (single/multiple choice) validator.
//!
//! All-or-nothing: the full submitted answer array must equal the
//! correct array exactly. A missing or empty submission is accepted and
//! counts as zero matches rather than failing validation.

use serde_json::Value;

use crate::config::GradingConfig;
use crate::core::{Exercise, ExerciseKind};
use crate::error::Result;
use crate::grading::validators::{key_answers, AnswerValidator, ValidationOutcome};

/// Validator for selection exercises.
#[derive(Debug, Default)]
pub struct SelectionValidator;

impl AnswerValidator for SelectionValidator {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Selection
    }

    fn validate(
        &self,
        exercise: &Exercise,
        submitted: &Value,
        _config: &GradingConfig,
    ) -> Result<ValidationOutcome> {
        let answers = key_answers(exercise)?;

        let matched = match submitted {
            Value::Null => 0,
            Value::Array(items) if items.is_empty() => 0,
            Value::Array(items) => u32::from(items == answers),
            // A bare scalar is compared as a one-element selection
            other => u32::from(answers.len() == 1 && answers[0] == *other),
        };

        Ok(ValidationOutcome::Matched { matched, total: 1 })
    }
}
