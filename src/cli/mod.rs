//! CLI commands.
//!
//! Each command owns its options, output shape, and formatting:
//! - **Learner commands**: grade, complete-lesson (mutations)
//! - **Read commands**: profile, achievements, levels
//! - **Author commands**: add-exercise

pub mod achievements_cmd;
pub mod exercises_cmd;
pub mod grade;
pub mod lesson;
pub mod levels;
pub mod profile;

pub use achievements_cmd::AchievementsCommand;
pub use exercises_cmd::AddExerciseCommand;
pub use grade::GradeCommand;
pub use lesson::CompleteLessonCommand;
pub use levels::LevelsCommand;
pub use profile::ProfileCommand;
