//! Fill-in-the-blank validator.
//!
//! One answer per blank, compared case-insensitively after trimming
//! whitespace, position-aligned against the answer key. The sub-item
//! total is the key length; a short submission is tolerated by counting
//! absent positions as non-matches. A non-array submission is a
//! validation error.

use serde_json::Value;

use crate::config::GradingConfig;
use crate::core::{Exercise, ExerciseKind};
use crate::error::{EngineError, Result};
use crate::grading::validators::{key_answers, AnswerValidator, ValidationOutcome};

/// Validator for fill-blank exercises.
#[derive(Debug, Default)]
pub struct FillBlankValidator;

impl AnswerValidator for FillBlankValidator {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::FillBlank
    }

    fn validate(
        &self,
        exercise: &Exercise,
        submitted: &Value,
        _config: &GradingConfig,
    ) -> Result<ValidationOutcome> {
        let answers = key_answers(exercise)?;

        let Some(entries) = submitted.as_array() else {
            return Err(EngineError::validation(
                self.kind().as_str(),
                "submission must be an array with one answer per blank",
            ));
        };

        let matched = answers
            .iter()
            .enumerate()
            .filter(|(i, expected)| {
                matches!(
                    (expected.as_str(), entries.get(*i).and_then(Value::as_str)),
                    (Some(want), Some(got)) if normalize(want) == normalize(got)
                )
            })
            .count() as u32;

        Ok(ValidationOutcome::Matched {
            matched,
            total: answers.len() as u32,
        })
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
