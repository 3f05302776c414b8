//! Free-writing validator.
//!
//! Writing has no answer key. The submission is measured by whitespace
//! word count against a minimum threshold taken from the exercise
//! content's `min_words` field, falling back to the configured default.
//! Null or missing text counts as zero words so an empty submission is
//! still a gradable attempt.

use serde_json::Value;

use crate::config::GradingConfig;
use crate::core::{Exercise, ExerciseKind};
use crate::error::{EngineError, Result};
use crate::grading::validators::{AnswerValidator, ValidationOutcome};

/// Validator for writing exercises.
#[derive(Debug, Default)]
pub struct WritingValidator;

impl AnswerValidator for WritingValidator {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Writing
    }

    fn validate(
        &self,
        exercise: &Exercise,
        submitted: &Value,
        config: &GradingConfig,
    ) -> Result<ValidationOutcome> {
        let words = match submitted {
            Value::Null => 0,
            Value::String(text) => text.split_whitespace().count() as u32,
            _ => {
                return Err(EngineError::validation(
                    self.kind().as_str(),
                    "submission must be the written text as a string",
                ))
            }
        };

        let min_words = exercise
            .content
            .get("min_words")
            .and_then(Value::as_u64)
            .map(|n| n as u32)
            .unwrap_or(config.default_min_words);

        Ok(ValidationOutcome::WordCount { words, min_words })
    }
}
