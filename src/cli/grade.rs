//! Grade command.
//!
//! Grades a submitted answer against a stored exercise and prints the
//! report, any XP awarded, and any achievements unlocked.

use serde::Serialize;
use serde_json::Value;

use crate::engine::{Engine, GradeReport};
use crate::progression::{GrantedAchievement, XpAward};
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// Options for the grade command.
#[derive(Debug, Clone, Default)]
pub struct GradeOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the grade command.
#[derive(Debug, Clone, Serialize)]
pub struct GradeCmdOutput {
    /// Whether grading succeeded.
    pub success: bool,
    /// The grade report when grading succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<GradeReport>,
    /// XP awarded for the score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<XpAward>,
    /// Achievements newly unlocked.
    pub achievements: Vec<GrantedAchievement>,
    /// Error message if grading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GradeCmdOutput {
    /// Create a successful output.
    pub fn success(
        report: GradeReport,
        xp: Option<XpAward>,
        achievements: Vec<GrantedAchievement>,
    ) -> Self {
        Self {
            success: true,
            report: Some(report),
            xp,
            achievements,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            report: None,
            xp: None,
            achievements: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The grade command implementation.
pub struct GradeCommand<S> {
    engine: Engine<S>,
}

impl<S> GradeCommand<S>
where
    S: ExerciseStore + AttemptStore + ProfileStore + LessonProgressStore,
{
    /// Create a new grade command.
    pub fn new(engine: Engine<S>) -> Self {
        Self { engine }
    }

    /// Grade `answer_json` (raw JSON text) against an exercise.
    pub fn run(
        &self,
        exercise_id: &str,
        learner_id: &str,
        answer_json: &str,
        _options: &GradeOptions,
    ) -> GradeCmdOutput {
        let submitted: Value = match serde_json::from_str(answer_json) {
            Ok(value) => value,
            Err(err) => return GradeCmdOutput::failure(format!("invalid answer JSON: {}", err)),
        };

        match self.engine.grade(exercise_id, learner_id, submitted) {
            Ok(outcome) => {
                GradeCmdOutput::success(outcome.report, outcome.xp, outcome.achievements)
            }
            Err(err) => GradeCmdOutput::failure(err.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GradeCmdOutput, options: &GradeOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &GradeCmdOutput) -> String {
        let Some(report) = &output.report else {
            return format!(
                "Grading failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        };

        let mut text = if report.correct {
            format!("Correct! {}/{} points\n", report.score, report.max_score)
        } else {
            format!("Not quite. {}/{} points\n", report.score, report.max_score)
        };
        if !report.explanation.is_empty() {
            text.push_str(&format!("Explanation: {}\n", report.explanation));
        }
        if let Some(xp) = &output.xp {
            text.push_str(&format!("+{} XP (total {})\n", xp.granted, xp.total_xp));
            if xp.leveled_up {
                text.push_str(&format!("Level up! Now at {}\n", xp.new_level));
            }
        }
        for achievement in &output.achievements {
            text.push_str(&format!(
                "Achievement unlocked: {} ({})\n",
                achievement.title, achievement.description
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{Exercise, ExerciseKind};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn command_with_exercise() -> GradeCommand<MemoryStore> {
        let store = MemoryStore::new();
        store
            .put_exercise(&Exercise::new(
                "ex-1",
                "lesson-1",
                "Pick the greeting",
                ExerciseKind::Selection,
                json!({"question": "q", "options": ["Hola", "Adios"]}),
                json!({"answers": [0]}),
                10,
            ))
            .unwrap();
        GradeCommand::new(Engine::new(store, Config::default()))
    }

    #[test]
    fn test_grade_correct() {
        let cmd = command_with_exercise();
        let output = cmd.run("ex-1", "l-1", "[0]", &GradeOptions::default());

        assert!(output.success);
        let report = output.report.unwrap();
        assert!(report.correct);
        assert_eq!(report.score, 10);
        assert_eq!(output.xp.unwrap().granted, 10);
    }

    #[test]
    fn test_grade_invalid_json() {
        let cmd = command_with_exercise();
        let output = cmd.run("ex-1", "l-1", "not json", &GradeOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("invalid answer JSON"));
    }

    #[test]
    fn test_grade_unknown_exercise() {
        let cmd = command_with_exercise();
        let output = cmd.run("missing", "l-1", "[0]", &GradeOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("missing"));
    }

    #[test]
    fn test_format_json() {
        let cmd = command_with_exercise();
        let output = cmd.run("ex-1", "l-1", "[0]", &GradeOptions::default());
        let formatted = cmd.format_output(
            &output,
            &GradeOptions {
                json: true,
                quiet: false,
            },
        );

        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed["success"], json!(true));
        assert_eq!(parsed["report"]["maxScore"], json!(10));
    }

    #[test]
    fn test_format_human() {
        let cmd = command_with_exercise();
        let output = cmd.run("ex-1", "l-1", "[0]", &GradeOptions::default());
        let formatted = cmd.format_output(&output, &GradeOptions::default());

        assert!(formatted.contains("Correct! 10/10"));
        assert!(formatted.contains("+10 XP"));
    }

    #[test]
    fn test_quiet_suppresses_output() {
        let cmd = command_with_exercise();
        let output = cmd.run("ex-1", "l-1", "[0]", &GradeOptions::default());
        let formatted = cmd.format_output(
            &output,
            &GradeOptions {
                json: false,
                quiet: true,
            },
        );
        assert!(formatted.is_empty());
    }
}
