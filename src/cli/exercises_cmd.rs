//! Add-exercise command.
//!
//! Ingests an author-side exercise definition from a JSON document and
//! stores it for grading.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::core::{Exercise, ExerciseKind};
use crate::storage::ExerciseStore;

/// Options for the add-exercise command.
#[derive(Debug, Clone, Default)]
pub struct AddExerciseOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Author-side exercise definition (JSON input).
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseInput {
    /// Unique exercise identifier.
    pub id: String,
    /// Lesson the exercise belongs to.
    pub lesson_id: String,
    /// Display title.
    pub title: String,
    /// Exercise type tag.
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    /// Type-specific content payload.
    pub content: Value,
    /// Correct-answer spec; omitted for writing exercises.
    #[serde(default)]
    pub answer_key: Value,
    /// Point ceiling; the configured default applies when omitted.
    #[serde(default)]
    pub max_points: Option<u32>,
}

/// Output format for the add-exercise command.
#[derive(Debug, Clone, Serialize)]
pub struct AddExerciseOutput {
    /// Whether the exercise was stored.
    pub success: bool,
    /// The stored exercise ID.
    pub id: String,
    /// The stored type tag.
    pub kind: String,
    /// Error message if ingestion failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddExerciseOutput {
    /// Create a successful output.
    pub fn success(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            success: true,
            id: id.into(),
            kind: kind.into(),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: String::new(),
            kind: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The add-exercise command implementation.
pub struct AddExerciseCommand<S> {
    store: S,
    config: Config,
}

impl<S: ExerciseStore> AddExerciseCommand<S> {
    /// Create a new add-exercise command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Parse and store an exercise definition from JSON text.
    pub fn run(&self, definition_json: &str, _options: &AddExerciseOptions) -> AddExerciseOutput {
        let input: ExerciseInput = match serde_json::from_str(definition_json) {
            Ok(input) => input,
            Err(err) => {
                return AddExerciseOutput::failure(format!("invalid exercise JSON: {}", err))
            }
        };

        // Keyed kinds need an answers array before learners hit them
        if input.kind != ExerciseKind::Writing
            && input
                .answer_key
                .get("answers")
                .and_then(Value::as_array)
                .is_none()
        {
            return AddExerciseOutput::failure(format!(
                "{} exercises need an answer_key with an answers array",
                input.kind
            ));
        }

        let max_points = input
            .max_points
            .unwrap_or(self.config.grading.default_max_points);
        let exercise = Exercise::new(
            input.id,
            input.lesson_id,
            input.title,
            input.kind,
            input.content,
            input.answer_key,
            max_points,
        );

        match self.store.put_exercise(&exercise) {
            Ok(()) => AddExerciseOutput::success(exercise.id, exercise.kind.as_str()),
            Err(err) => AddExerciseOutput::failure(err.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(
        &self,
        output: &AddExerciseOutput,
        options: &AddExerciseOptions,
    ) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            format!("Stored {} exercise '{}'\n", output.kind, output.id)
        } else {
            format!(
                "Add exercise failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
