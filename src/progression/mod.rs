//! Progression: XP accounting, streaks, and achievements.

pub mod achievements;
pub mod ledger;
pub mod streak;

pub use achievements::{AchievementEngine, AchievementProgress, GrantedAchievement};
pub use ledger::{ProgressionLedger, XpAward};
pub use streak::{StreakTracker, StreakUpdate};
