//! The fixed achievement catalog.
//!
//! A process-wide immutable table: loaded as a static slice, never
//! mutated, safe to share across concurrent requests without
//! synchronization. Unlock conditions are a small tagged enum evaluated
//! against aggregate learner statistics, not user-extensible predicates.

use serde::{Deserialize, Serialize};

use crate::core::levels::CefrLevel;
use crate::core::profile::AggregateStats;

/// Unlock condition over aggregate learner statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockRule {
    /// At least N lessons completed.
    LessonsCompleted(u32),
    /// At least N lessons completed with a 100% result.
    PerfectLessons(u32),
    /// Streak of at least N consecutive days.
    StreakDays(u32),
    /// At least N total XP.
    TotalXp(u64),
    /// Every active lesson at the given level completed.
    LevelMastered(CefrLevel),
}

impl UnlockRule {
    /// Evaluate the rule against a learner's aggregate statistics.
    pub fn is_satisfied(&self, stats: &AggregateStats) -> bool {
        match *self {
            UnlockRule::LessonsCompleted(n) => stats.lessons_completed >= n,
            UnlockRule::PerfectLessons(n) => stats.perfect_lessons >= n,
            UnlockRule::StreakDays(n) => stats.streak_days >= n,
            UnlockRule::TotalXp(n) => stats.total_xp >= n,
            UnlockRule::LevelMastered(level) => stats.completion_at(level).is_exhausted(),
        }
    }
}

/// One entry in the achievement catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AchievementSpec {
    /// Stable identifier stored on learner profiles.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Unlock condition.
    pub rule: UnlockRule,
}

/// The fixed, process-wide achievement catalog.
pub const CATALOG: &[AchievementSpec] = &[
    AchievementSpec {
        id: "first_lesson",
        title: "First Lesson",
        description: "Completed your first lesson",
        rule: UnlockRule::LessonsCompleted(1),
    },
    AchievementSpec {
        id: "dedicated_10",
        title: "Dedicated Student",
        description: "Completed 10 lessons",
        rule: UnlockRule::LessonsCompleted(10),
    },
    AchievementSpec {
        id: "scholar_50",
        title: "Scholar",
        description: "Completed 50 lessons",
        rule: UnlockRule::LessonsCompleted(50),
    },
    AchievementSpec {
        id: "master_100",
        title: "Language Master",
        description: "Completed 100 lessons",
        rule: UnlockRule::LessonsCompleted(100),
    },
    AchievementSpec {
        id: "perfectionist",
        title: "Perfectionist",
        description: "Scored 100% on a lesson",
        rule: UnlockRule::PerfectLessons(1),
    },
    AchievementSpec {
        id: "streak_7",
        title: "7-Day Streak",
        description: "Studied 7 days in a row",
        rule: UnlockRule::StreakDays(7),
    },
    AchievementSpec {
        id: "streak_30",
        title: "30-Day Streak",
        description: "Studied 30 days in a row",
        rule: UnlockRule::StreakDays(30),
    },
    AchievementSpec {
        id: "xp_1000",
        title: "1000 XP",
        description: "Reached 1000 experience points",
        rule: UnlockRule::TotalXp(1000),
    },
    AchievementSpec {
        id: "mastery_a1",
        title: "A1 Mastery",
        description: "Completed every A1 lesson",
        rule: UnlockRule::LevelMastered(CefrLevel::A1),
    },
    AchievementSpec {
        id: "mastery_a2",
        title: "A2 Mastery",
        description: "Completed every A2 lesson",
        rule: UnlockRule::LevelMastered(CefrLevel::A2),
    },
    AchievementSpec {
        id: "mastery_b1",
        title: "B1 Mastery",
        description: "Completed every B1 lesson",
        rule: UnlockRule::LevelMastered(CefrLevel::B1),
    },
    AchievementSpec {
        id: "mastery_b2",
        title: "B2 Mastery",
        description: "Completed every B2 lesson",
        rule: UnlockRule::LevelMastered(CefrLevel::B2),
    },
    AchievementSpec {
        id: "mastery_c1",
        title: "C1 Mastery",
        description: "Completed every C1 lesson",
        rule: UnlockRule::LevelMastered(CefrLevel::C1),
    },
    AchievementSpec {
        id: "mastery_c2",
        title: "C2 Mastery",
        description: "Completed every C2 lesson",
        rule: UnlockRule::LevelMastered(CefrLevel::C2),
    },
];

/// Look up a catalog entry by identifier.
///
/// Returns `None` for identifiers not in the catalog (e.g. stale data on
/// a profile); callers log and skip rather than failing.
pub fn find(id: &str) -> Option<&'static AchievementSpec> {
    CATALOG.iter().find(|spec| spec.id == id)
}
