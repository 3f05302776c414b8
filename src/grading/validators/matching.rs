//! Matching (pair association) validator.
//!
//! The answer key lists the correct right-hand choice for each
//! left-hand item in order; the submission is compared position by
//! position with full JSON equality, so keys may hold indices or
//! strings as the exercise author prefers. An unanswered pair is
//! submitted as null and never matches.

use serde_json::Value;

use crate::config::GradingConfig;
use crate::core::{Exercise, ExerciseKind};
use crate::error::{EngineError, Result};
use crate::grading::validators::{key_answers, AnswerValidator, ValidationOutcome};

/// Validator for matching exercises.
#[derive(Debug, Default)]
pub struct MatchingValidator;

impl AnswerValidator for MatchingValidator {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Matching
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
                "submission must be an array with one choice per pair",
            ));
        };

        let matched = answers
            .iter()
            .enumerate()
            .filter(|(i, expected)| match entries.get(*i) {
                None | Some(Value::Null) => false,
                Some(got) => got == *expected,
            })
            .count() as u32;

        Ok(ValidationOutcome::Matched {
            matched,
            total: answers.len() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(answers: Value) -> Exercise {
        Exercise::new(
            "ex-1",
            "l-1",
            "Match the pairs",
            ExerciseKind::Matching,
            json!({
                "left": ["perro", "gato", "pájaro"],
                "right": ["bird", "dog", "cat"]
            }),
            json!({ "answers": answers }),
            10,
        )
    }

    fn validate(ex: &Exercise, submitted: Value) -> Result<ValidationOutcome> {
        MatchingValidator.validate(ex, &submitted, &GradingConfig::default())
    }

    #[test]
    fn test_all_pairs_matched() {
        let ex = exercise(json!([1, 2, 0]));
        assert_eq!(
            validate(&ex, json!([1, 2, 0])).unwrap(),
            ValidationOutcome::Matched { matched: 3, total: 3 }
        );
    }

    #[test]
    fn test_partial_pairs() {
        let ex = exercise(json!([1, 2, 0]));
        assert_eq!(
            validate(&ex, json!([1, 0, 2])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 3 }
        );
    }

    #[test]
    fn test_string_keys_supported() {
        let ex = exercise(json!(["dog", "cat", "bird"]));
        assert_eq!(
            validate(&ex, json!(["dog", "bird", "cat"])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 3 }
        );
    }

    #[test]
    fn test_null_entries_never_match() {
        let ex = exercise(json!([1, 2, 0]));
        assert_eq!(
            validate(&ex, json!([1, null, null])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 3 }
        );
    }

    #[test]
    fn test_short_submission_tolerated() {
        let ex = exercise(json!([1, 2, 0]));
        assert_eq!(
            validate(&ex, json!([1])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 3 }
        );
    }

    #[test]
    fn test_non_array_submission_rejected() {
        let ex = exercise(json!([1, 2, 0]));
        let err = validate(&ex, json!({"perro": 1})).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("matching"));
    }

    #[test]
    fn test_malformed_key_rejected() {
        let ex = exercise(json!("dog"));
        assert!(validate(&ex, json!([0])).is_err());
    }
}
