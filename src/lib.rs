//! Lexigrade - exercise grading and learner progression engine.
//!
//! Lexigrade validates submitted answers for the five exercise kinds of
//! a language-learning platform, converts them into scores and XP,
//! and tracks each learner's level, daily streak, and achievements.

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod grading;
pub mod progression;
pub mod storage;

pub use config::Config;
pub use core::{
    Attempt, CefrLevel, Exercise, ExerciseKind, ExerciseStatus, LearnerProfile, Lesson,
};
pub use engine::{Engine, GradeOutcome, GradeReport, LessonOutcome, ProfileView};
pub use error::{EngineError, Result};
pub use grading::{score_outcome, validator_for, ScoreResult, ValidationOutcome};
pub use progression::{
    AchievementEngine, GrantedAchievement, ProgressionLedger, StreakTracker, StreakUpdate, XpAward,
};
pub use storage::{
    AttemptStore, ExerciseStore, FileStore, LessonProgressStore, MemoryStore, ProfileStore,
};

// CLI commands
pub use cli::{
    AchievementsCommand, AddExerciseCommand, CompleteLessonCommand, GradeCommand, LevelsCommand,
    ProfileCommand,
};
