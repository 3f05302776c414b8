//! Exercise and attempt types.
//!
//! Content specifications, answer keys, and submitted answers are
//! type-shaped JSON values, matching how the platform stores them.
//! The engine never interprets them outside the validator for the
//! exercise's own kind.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// The fixed catalog of exercise kinds.
///
/// Unknown type tags at the grading boundary are rejected with an
/// unsupported-type error; there is no default scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Single or multiple choice; all-or-nothing against the full answer set.
    Selection,
    /// Fill in the blanks; one answer per blank, partial credit.
    FillBlank,
    /// True/false statements; position-aligned booleans, partial credit.
    TrueFalse,
    /// Match left-hand items to right-hand choices; partial credit.
    Matching,
    /// Free text gated on a minimum word count.
    Writing,
}

impl ExerciseKind {
    /// String tag used in storage and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Selection => "selection",
            ExerciseKind::FillBlank => "fill_blank",
            ExerciseKind::TrueFalse => "true_false",
            ExerciseKind::Matching => "matching",
            ExerciseKind::Writing => "writing",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selection" => Ok(ExerciseKind::Selection),
            "fill_blank" => Ok(ExerciseKind::FillBlank),
            "true_false" => Ok(ExerciseKind::TrueFalse),
            "matching" => Ok(ExerciseKind::Matching),
            "writing" => Ok(ExerciseKind::Writing),
            other => Err(EngineError::unsupported_type(other)),
        }
    }
}

/// Exercise lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    #[default]
    Active,
    Retired,
}

/// An exercise as authored.
///
/// Immutable once attempts reference it except for administrative edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    /// Unique exercise identifier.
    pub id: String,
    /// Lesson this exercise belongs to.
    pub lesson_id: String,
    /// Display title.
    pub title: String,
    /// Exercise kind; selects the validator.
    pub kind: ExerciseKind,
    /// Type-shaped content spec (question/options, text/blanks, ...).
    pub content: Value,
    /// Type-shaped correct-answer spec. Null for writing exercises.
    pub answer_key: Value,
    /// Maximum points awardable; always positive.
    pub max_points: u32,
    /// Lifecycle state.
    pub status: ExerciseStatus,
    /// When the exercise was created.
    pub created_at: DateTime<Utc>,
}

impl Exercise {
    /// Create a new active exercise.
    pub fn new(
        id: impl Into<String>,
        lesson_id: impl Into<String>,
        title: impl Into<String>,
        kind: ExerciseKind,
        content: Value,
        answer_key: Value,
        max_points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            lesson_id: lesson_id.into(),
            title: title.into(),
            kind,
            content,
            answer_key,
            max_points,
            status: ExerciseStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Check whether the exercise accepts new attempts.
    pub fn is_active(&self) -> bool {
        self.status == ExerciseStatus::Active
    }

    /// The explanation from the content spec, if the author provided one.
    pub fn explanation(&self) -> String {
        self.content
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// One graded submission. Append-only; history is retained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attempt {
    /// The exercise that was attempted.
    pub exercise_id: String,
    /// The learner who submitted.
    pub learner_id: String,
    /// The raw submitted answer payload.
    pub submitted: Value,
    /// Computed score, `0 ..= max_points`.
    pub score: u32,
    /// Whether the attempt was fully correct.
    pub correct: bool,
    /// When the submission was graded.
    pub submitted_at: DateTime<Utc>,
}

impl Attempt {
    /// Record a graded submission at the current time.
    pub fn new(
        exercise_id: impl Into<String>,
        learner_id: impl Into<String>,
        submitted: Value,
        score: u32,
        correct: bool,
    ) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            learner_id: learner_id.into(),
            submitted,
            score,
            correct,
            submitted_at: Utc::now(),
        }
    }
}
