//! Achievements command.
//!
//! Lists a learner's unlocked achievements and what remains locked in
//! the catalog.

use serde::Serialize;

use crate::core::CATALOG;
use crate::engine::Engine;
use crate::progression::GrantedAchievement;
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// Options for the achievements command.
#[derive(Debug, Clone, Default)]
pub struct AchievementsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Include locked achievements in the listing.
    pub all: bool,
}

/// Output format for the achievements command.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementsOutput {
    /// Whether the lookup succeeded.
    pub success: bool,
    /// Unlocked achievements.
    pub unlocked: Vec<GrantedAchievement>,
    /// Locked achievement titles (when `--all` was given).
    pub locked: Vec<String>,
    /// Total achievements in the catalog.
    pub total: u32,
    /// Error message if the lookup failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AchievementsOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            unlocked: Vec::new(),
            locked: Vec::new(),
            total: 0,
            error: Some(error.into()),
        }
    }
}

/// The achievements command implementation.
pub struct AchievementsCommand<S> {
    engine: Engine<S>,
}

impl<S> AchievementsCommand<S>
where
    S: ExerciseStore + AttemptStore + ProfileStore + LessonProgressStore,
{
    /// Create a new achievements command.
    pub fn new(engine: Engine<S>) -> Self {
        Self { engine }
    }

    /// List a learner's achievements.
    pub fn run(&self, learner_id: &str, options: &AchievementsOptions) -> AchievementsOutput {
        let progress = match self.engine.achievement_progress(learner_id) {
            Ok(progress) => progress,
            Err(err) => return AchievementsOutput::failure(err.to_string()),
        };

        let locked = if options.all {
            CATALOG
                .iter()
                .filter(|spec| !progress.unlocked.iter().any(|u| u.id == spec.id))
                .map(|spec| spec.title.to_string())
                .collect()
        } else {
            Vec::new()
        };

        AchievementsOutput {
            success: true,
            unlocked: progress.unlocked,
            locked,
            total: progress.total,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(
        &self,
        output: &AchievementsOutput,
        options: &AchievementsOptions,
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
    fn format_human_readable(&self, output: &AchievementsOutput) -> String {
        if !output.success {
            return format!(
                "Achievements lookup failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut text = format!(
            "Unlocked {}/{} achievements\n",
            output.unlocked.len(),
            output.total
        );
        for achievement in &output.unlocked {
            text.push_str(&format!(
                "  [x] {} ({})\n",
                achievement.title, achievement.description
            ));
        }
        for title in &output.locked {
            text.push_str(&format!("  [ ] {}\n", title));
        }
        text
    }
}
