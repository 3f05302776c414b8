//! Core domain types: exercises, learner profiles, levels, achievements.

pub mod catalog;
pub mod exercise;
pub mod lesson;
pub mod levels;
pub mod profile;

pub use catalog::{find as find_achievement, AchievementSpec, UnlockRule, CATALOG};
pub use exercise::{Attempt, Exercise, ExerciseKind, ExerciseStatus};
pub use lesson::Lesson;
pub use levels::{
    level_for_xp, progress_toward_next, CefrLevel, LevelProgress, LEVEL_THRESHOLDS,
};
pub use profile::{
    AggregateStats, LearnerProfile, LevelCompletion, UnlockedAchievement,
};
