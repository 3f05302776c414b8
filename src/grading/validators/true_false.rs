//! True/false validator.
//!
//! Position-aligned boolean equality against the answer key. A single
//! bare boolean is promoted to a one-element array on either side for
//! backward compatibility with single-statement exercises; after
//! promotion, a non-array on either side is a validation error.

use serde_json::Value;

use crate::config::GradingConfig;
use crate::core::{Exercise, ExerciseKind};
use crate::error::{EngineError, Result};
use crate::grading::validators::{AnswerValidator, ValidationOutcome};

/// Validator for true/false exercises.
#[derive(Debug, Default)]
pub struct TrueFalseValidator;

impl AnswerValidator for TrueFalseValidator {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::TrueFalse
    }

    fn validate(
        &self,
        exercise: &Exercise,
        submitted: &Value,
        _config: &GradingConfig,
    ) -> Result<ValidationOutcome> {
        let key = exercise.answer_key.get("answers").unwrap_or(&Value::Null);

        let answers = promote(key).ok_or_else(|| {
            EngineError::validation(
                self.kind().as_str(),
                "answer key must be a boolean array",
            )
        })?;
        let entries = promote(submitted).ok_or_else(|| {
            EngineError::validation(
                self.kind().as_str(),
                "submission must be a boolean or an array of booleans",
            )
        })?;

        let matched = answers
            .iter()
            .enumerate()
            .filter(|(i, expected)| {
                matches!(
                    (expected.as_bool(), entries.get(*i).and_then(Value::as_bool)),
                    (Some(want), Some(got)) if want == got
                )
            })
            .count() as u32;

        Ok(ValidationOutcome::Matched {
            matched,
            total: answers.len() as u32,
        })
    }
}

/// Promote a bare boolean to a one-element array; pass arrays through.
fn promote(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Bool(b) => Some(vec![Value::Bool(*b)]),
        Value::Array(items) => Some(items.clone()),
        _ => None,
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
            "True or false",
            ExerciseKind::TrueFalse,
            json!({"statements": ["Paris is in France", "Berlin is in Spain"]}),
            json!({ "answers": answers }),
            9,
        )
    }

    fn validate(ex: &Exercise, submitted: Value) -> Result<ValidationOutcome> {
        TrueFalseValidator.validate(ex, &submitted, &GradingConfig::default())
    }

    #[test]
    fn test_all_correct() {
        let ex = exercise(json!([true, false]));
        assert_eq!(
            validate(&ex, json!([true, false])).unwrap(),
            ValidationOutcome::Matched { matched: 2, total: 2 }
        );
    }

    #[test]
    fn test_two_of_three() {
        let ex = exercise(json!([true, false, true]));
        assert_eq!(
            validate(&ex, json!([true, false, false])).unwrap(),
            ValidationOutcome::Matched { matched: 2, total: 3 }
        );
    }

    #[test]
    fn test_single_bool_promoted_on_submission() {
        let ex = exercise(json!([true]));
        assert_eq!(
            validate(&ex, json!(true)).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 1 }
        );
    }

    #[test]
    fn test_single_bool_promoted_on_key() {
        let ex = exercise(json!(true));
        assert_eq!(
            validate(&ex, json!([true])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 1 }
        );
    }

    #[test]
    fn test_short_submission_tolerated() {
        let ex = exercise(json!([true, false, true]));
        assert_eq!(
            validate(&ex, json!([true])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 3 }
        );
    }

    #[test]
    fn test_non_bool_entry_is_non_match() {
        let ex = exercise(json!([true, false]));
        assert_eq!(
            validate(&ex, json!(["yes", false])).unwrap(),
            ValidationOutcome::Matched { matched: 1, total: 2 }
        );
    }

    #[test]
    fn test_non_array_submission_rejected() {
        let ex = exercise(json!([true]));
        let err = validate(&ex, json!("true")).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("true_false"));
    }

    #[test]
    fn test_malformed_key_rejected() {
        let ex = exercise(json!("true"));
        assert!(validate(&ex, json!([true])).is_err());
    }
}
