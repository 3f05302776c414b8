//! Complete-lesson command.
//!
//! Records a lesson completion and prints the XP, streak, and
//! achievement notifications the completion produced.

use serde::Serialize;

use crate::core::CefrLevel;
use crate::engine::Engine;
use crate::progression::{GrantedAchievement, StreakUpdate, XpAward};
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// Options for the complete-lesson command.
#[derive(Debug, Clone, Default)]
pub struct CompleteLessonOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the complete-lesson command.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteLessonOutput {
    /// Whether the command succeeded.
    pub success: bool,
    /// Whether this was the first completion.
    pub newly_completed: bool,
    /// XP awarded, absent on repeats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp: Option<XpAward>,
    /// Streak update, absent on repeats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakUpdate>,
    /// Achievements newly unlocked.
    pub achievements: Vec<GrantedAchievement>,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompleteLessonOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            newly_completed: false,
            xp: None,
            streak: None,
            achievements: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The complete-lesson command implementation.
pub struct CompleteLessonCommand<S> {
    engine: Engine<S>,
}

impl<S> CompleteLessonCommand<S>
where
    S: ExerciseStore + AttemptStore + ProfileStore + LessonProgressStore,
{
    /// Create a new complete-lesson command.
    pub fn new(engine: Engine<S>) -> Self {
        Self { engine }
    }

    /// Record a lesson completion.
    pub fn run(
        &self,
        learner_id: &str,
        lesson_id: &str,
        level: &str,
        percent: u32,
        _options: &CompleteLessonOptions,
    ) -> CompleteLessonOutput {
        let level: CefrLevel = match level.parse() {
            Ok(level) => level,
            Err(err) => return CompleteLessonOutput::failure(err.to_string()),
        };

        match self
            .engine
            .complete_lesson(learner_id, lesson_id, level, percent)
        {
            Ok(outcome) => CompleteLessonOutput {
                success: true,
                newly_completed: outcome.newly_completed,
                xp: outcome.xp,
                streak: outcome.streak,
                achievements: outcome.achievements,
                error: None,
            },
            Err(err) => CompleteLessonOutput::failure(err.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(
        &self,
        output: &CompleteLessonOutput,
        options: &CompleteLessonOptions,
    ) -> String {
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
    fn format_human_readable(&self, output: &CompleteLessonOutput) -> String {
        if !output.success {
            return format!(
                "Lesson completion failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }
        if !output.newly_completed {
            return "Lesson was already completed; nothing to award.\n".to_string();
        }

        let mut text = String::from("Lesson completed!\n");
        if let Some(xp) = &output.xp {
            text.push_str(&format!("+{} XP (total {})\n", xp.granted, xp.total_xp));
            if xp.leveled_up {
                text.push_str(&format!("Level up! Now at {}\n", xp.new_level));
            }
        }
        if let Some(streak) = &output.streak {
            text.push_str(&format!("Streak: {} day(s)\n", streak.current));
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
