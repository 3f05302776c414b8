//! Learner profile and aggregate statistics types.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::levels::CefrLevel;

/// A learner's progression state.
///
/// Created on first profile access; mutated by the progression ledger,
/// the streak tracker, and the achievement engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearnerProfile {
    /// Unique learner identifier.
    pub learner_id: String,
    /// The language the learner is studying.
    pub language: String,
    /// Total XP; non-negative and monotonically non-decreasing.
    pub total_xp: u64,
    /// Current proficiency level. Advances through lesson exhaustion only.
    pub level: CefrLevel,
    /// Consecutive-day activity counter. 0 only before first activity.
    pub streak_days: u32,
    /// Date of the most recent qualifying activity.
    pub last_activity: Option<NaiveDate>,
    /// Unlocked achievements; each identifier appears at most once.
    pub achievements: Vec<UnlockedAchievement>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl LearnerProfile {
    /// Create a fresh profile at A1 with no activity.
    pub fn new(learner_id: impl Into<String>, language: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            learner_id: learner_id.into(),
            language: language.into(),
            total_xp: 0,
            level: CefrLevel::A1,
            streak_days: 0,
            last_activity: None,
            achievements: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether an achievement is already unlocked.
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    /// Update the profile's updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// An unlocked achievement with its unlock time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockedAchievement {
    /// Achievement identifier from the catalog.
    pub id: String,
    /// When the achievement was granted.
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedAchievement {
    /// Record an unlock at the current time.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unlocked_at: Utc::now(),
        }
    }
}

/// Completion counts for one level/language pairing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelCompletion {
    /// Active lessons the learner has completed at this level.
    pub completed: u32,
    /// Active lessons available at this level.
    pub total: u32,
}

impl LevelCompletion {
    /// All available lessons completed, and there was at least one.
    pub fn is_exhausted(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// Aggregate learner statistics evaluated by achievement predicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    /// Lessons completed across all levels.
    pub lessons_completed: u32,
    /// Total XP.
    pub total_xp: u64,
    /// Current streak length in days.
    pub streak_days: u32,
    /// Lessons completed with a 100% result.
    pub perfect_lessons: u32,
    /// Per-level completion counts for the learner's language.
    pub level_completion: HashMap<CefrLevel, LevelCompletion>,
}

impl AggregateStats {
    /// Completion counts for one level, defaulting to empty.
    pub fn completion_at(&self, level: CefrLevel) -> LevelCompletion {
        self.level_completion.get(&level).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_defaults() {
        let profile = LearnerProfile::new("learner-1", "french");
        assert_eq!(profile.total_xp, 0);
        assert_eq!(profile.level, CefrLevel::A1);
        assert_eq!(profile.streak_days, 0);
        assert!(profile.last_activity.is_none());
        assert!(profile.achievements.is_empty());
    }

    #[test]
    fn test_has_achievement() {
        let mut profile = LearnerProfile::new("learner-1", "french");
        assert!(!profile.has_achievement("first_lesson"));

        profile
            .achievements
            .push(UnlockedAchievement::new("first_lesson"));
        assert!(profile.has_achievement("first_lesson"));
        assert!(!profile.has_achievement("streak_7"));
    }

    #[test]
    fn test_level_completion_exhaustion() {
        assert!(!LevelCompletion::default().is_exhausted());
        assert!(!LevelCompletion {
            completed: 3,
            total: 5
        }
        .is_exhausted());
        assert!(LevelCompletion {
            completed: 5,
            total: 5
        }
        .is_exhausted());
        // Empty level never counts as mastered
        assert!(!LevelCompletion {
            completed: 0,
            total: 0
        }
        .is_exhausted());
    }

    #[test]
    fn test_completion_at_missing_level() {
        let stats = AggregateStats::default();
        assert_eq!(stats.completion_at(CefrLevel::B1), LevelCompletion::default());
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let mut profile = LearnerProfile::new("learner-1", "german");
        profile.total_xp = 420;
        profile.streak_days = 3;
        profile
            .achievements
            .push(UnlockedAchievement::new("first_lesson"));

        let json = serde_json::to_string(&profile).unwrap();
        let back: LearnerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_stats_serde_with_level_map() {
        let mut stats = AggregateStats {
            lessons_completed: 4,
            total_xp: 120,
            streak_days: 2,
            perfect_lessons: 1,
            level_completion: HashMap::new(),
        };
        stats.level_completion.insert(
            CefrLevel::A1,
            LevelCompletion {
                completed: 4,
                total: 4,
            },
        );

        let json = serde_json::to_string(&stats).unwrap();
        let back: AggregateStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
        assert!(back.completion_at(CefrLevel::A1).is_exhausted());
    }
}
