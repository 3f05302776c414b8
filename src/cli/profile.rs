//! Profile command.
//!
//! Shows a learner's profile: XP, level, progress toward the next
//! level, streak, and achievement counts.

use serde::Serialize;

use crate::engine::{Engine, ProfileView};
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// Options for the profile command.
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the profile command.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    /// Whether the lookup succeeded.
    pub success: bool,
    /// The profile view when the lookup succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ProfileView>,
    /// Error message if the lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileOutput {
    /// Create a successful output.
    pub fn success(view: ProfileView) -> Self {
        Self {
            success: true,
            view: Some(view),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            view: None,
            error: Some(error.into()),
        }
    }
}

/// The profile command implementation.
pub struct ProfileCommand<S> {
    engine: Engine<S>,
}

impl<S> ProfileCommand<S>
where
    S: ExerciseStore + AttemptStore + ProfileStore + LessonProgressStore,
{
    /// Create a new profile command.
    pub fn new(engine: Engine<S>) -> Self {
        Self { engine }
    }

    /// Look up a learner's profile.
    pub fn run(&self, learner_id: &str, _options: &ProfileOptions) -> ProfileOutput {
        match self.engine.profile(learner_id) {
            Ok(view) => ProfileOutput::success(view),
            Err(err) => ProfileOutput::failure(err.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ProfileOutput, options: &ProfileOptions) -> String {
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
    fn format_human_readable(&self, output: &ProfileOutput) -> String {
        let Some(view) = &output.view else {
            return format!(
                "Profile lookup failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        };

        let mut text = format!(
            "Learner: {} ({})\nLevel: {} | XP: {} | Streak: {} day(s)\n",
            view.profile.learner_id,
            view.profile.language,
            view.profile.level,
            view.profile.total_xp,
            view.profile.streak_days,
        );
        match view.level_progress.next {
            Some(next) => text.push_str(&format!(
                "Progress toward {}: {}% ({} XP to go)\n",
                next, view.level_progress.percent, view.level_progress.xp_to_next
            )),
            None => text.push_str("Top level reached.\n"),
        }
        text.push_str(&format!(
            "Achievements: {}/{}\n",
            view.achievements.unlocked.len(),
            view.achievements.total
        ));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::CefrLevel;
    use crate::storage::MemoryStore;

    fn command_with_activity() -> ProfileCommand<MemoryStore> {
        let engine = Engine::new(MemoryStore::new(), Config::default());
        engine
            .complete_lesson("l-1", "lesson-1", CefrLevel::A1, 100)
            .unwrap();
        ProfileCommand::new(engine)
    }

    #[test]
    fn test_profile_found() {
        let cmd = command_with_activity();
        let output = cmd.run("l-1", &ProfileOptions::default());

        assert!(output.success);
        let view = output.view.unwrap();
        assert_eq!(view.profile.total_xp, 10);
        // Perfect first completion: first_lesson, perfectionist, mastery_a1
        assert_eq!(view.achievements.unlocked.len(), 3);
    }

    #[test]
    fn test_profile_missing() {
        let cmd = command_with_activity();
        let output = cmd.run("ghost", &ProfileOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("ghost"));
    }

    #[test]
    fn test_format_human() {
        let cmd = command_with_activity();
        let output = cmd.run("l-1", &ProfileOptions::default());
        let formatted = cmd.format_output(&output, &ProfileOptions::default());

        assert!(formatted.contains("Learner: l-1"));
        assert!(formatted.contains("XP: 10"));
        assert!(formatted.contains("Achievements: 3/"));
    }

    #[test]
    fn test_format_json() {
        let cmd = command_with_activity();
        let output = cmd.run("l-1", &ProfileOptions::default());
        let formatted = cmd.format_output(
            &output,
            &ProfileOptions {
                json: true,
                quiet: false,
            },
        );

        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(parsed["view"]["profile"]["total_xp"], 10);
    }
}
