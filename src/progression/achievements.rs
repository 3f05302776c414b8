//! Achievement evaluation and granting.
//!
//! Every rule in the catalog is checked against a snapshot of the
//! learner's aggregate stats. Reads on this path fail open: a corrupt
//! or missing unlocked set degrades to "nothing unlocked yet" and the
//! store's idempotent grant collapses any duplicates, so a bad read can
//! delay an unlock notification but never double-award or block
//! grading.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::{find_achievement, AggregateStats, UnlockedAchievement, CATALOG};
use crate::error::{FailOpen, Result};
use crate::storage::ProfileStore;

/// An achievement unlocked for a learner, joined with its catalog spec.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GrantedAchievement {
    /// Catalog identifier.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Display description.
    pub description: &'static str,
    /// When it was unlocked.
    pub unlocked_at: DateTime<Utc>,
}

/// A learner's unlocked achievements against the full catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AchievementProgress {
    /// Unlocked achievements, joined with catalog specs.
    pub unlocked: Vec<GrantedAchievement>,
    /// Total achievements in the catalog.
    pub total: u32,
}

/// Evaluates unlock rules and grants achievements through a store.
pub struct AchievementEngine<'a, S> {
    store: &'a S,
}

impl<'a, S: ProfileStore> AchievementEngine<'a, S> {
    /// Create an engine over a profile store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Check every catalog rule and grant what the stats satisfy.
    ///
    /// Returns only the achievements newly granted by this call; ones
    /// the learner already had are skipped, and a concurrent duplicate
    /// grant collapses at the storage boundary.
    pub fn check_and_grant(
        &self,
        learner_id: &str,
        stats: &AggregateStats,
    ) -> Result<Vec<GrantedAchievement>> {
        let unlocked = self
            .store
            .achievements(learner_id)
            .fail_open_default("reading unlocked achievements");

        let mut granted = Vec::new();
        for spec in CATALOG {
            if unlocked.iter().any(|u| u.id == spec.id) {
                continue;
            }
            if !spec.rule.is_satisfied(stats) {
                continue;
            }

            let record = UnlockedAchievement::new(spec.id);
            if self.store.grant_achievement(learner_id, &record)? {
                info!(learner_id, achievement = spec.id, "achievement unlocked");
                granted.push(GrantedAchievement {
                    id: spec.id,
                    title: spec.title,
                    description: spec.description,
                    unlocked_at: record.unlocked_at,
                });
            }
        }
        Ok(granted)
    }

    /// The learner's unlocked achievements joined with the catalog.
    ///
    /// An unlocked ID with no catalog entry (removed from the catalog
    /// after it was granted) is logged and skipped.
    pub fn progress(&self, learner_id: &str) -> Result<AchievementProgress> {
        let mut unlocked = Vec::new();
        for record in self.store.achievements(learner_id)? {
            let Some(spec) = find_achievement(&record.id) else {
                warn!(
                    learner_id,
                    achievement = %record.id,
                    "unlocked achievement missing from catalog, skipping"
                );
                continue;
            };
            unlocked.push(GrantedAchievement {
                id: spec.id,
                title: spec.title,
                description: spec.description,
                unlocked_at: record.unlocked_at,
            });
        }
        Ok(AchievementProgress {
            unlocked,
            total: CATALOG.len() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CefrLevel, LevelCompletion};
    use crate::storage::MemoryStore;

    fn store_with_learner() -> MemoryStore {
        let store = MemoryStore::new();
        store.get_or_create_profile("l-1", "es").unwrap();
        store
    }

    fn stats_with_lessons(lessons: u32) -> AggregateStats {
        AggregateStats {
            lessons_completed: lessons,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_lesson_grant() {
        let store = store_with_learner();
        let engine = AchievementEngine::new(&store);

        let granted = engine
            .check_and_grant("l-1", &stats_with_lessons(1))
            .unwrap();
        assert_eq!(granted.len(), 1);
        assert_eq!(granted[0].id, "first_lesson");
    }

    #[test]
    fn test_no_grant_below_threshold() {
        let store = store_with_learner();
        let granted = AchievementEngine::new(&store)
            .check_and_grant("l-1", &stats_with_lessons(0))
            .unwrap();
        assert!(granted.is_empty());
    }

    #[test]
    fn test_already_unlocked_not_regranted() {
        let store = store_with_learner();
        let engine = AchievementEngine::new(&store);

        let first = engine
            .check_and_grant("l-1", &stats_with_lessons(1))
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = engine
            .check_and_grant("l-1", &stats_with_lessons(1))
            .unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_multiple_rules_in_one_pass() {
        let store = store_with_learner();
        let stats = AggregateStats {
            lessons_completed: 12,
            streak_days: 8,
            total_xp: 1200,
            ..Default::default()
        };

        let granted = AchievementEngine::new(&store)
            .check_and_grant("l-1", &stats)
            .unwrap();
        let ids: Vec<_> = granted.iter().map(|g| g.id).collect();
        assert!(ids.contains(&"first_lesson"));
        assert!(ids.contains(&"dedicated_10"));
        assert!(ids.contains(&"streak_7"));
        assert!(ids.contains(&"xp_1000"));
    }

    #[test]
    fn test_level_mastery_grant() {
        let store = store_with_learner();
        let mut stats = AggregateStats::default();
        stats.level_completion.insert(
            CefrLevel::A1,
            LevelCompletion { completed: 4, total: 4 },
        );

        let granted = AchievementEngine::new(&store)
            .check_and_grant("l-1", &stats)
            .unwrap();
        assert!(granted.iter().any(|g| g.id == "mastery_a1"));
        assert!(!granted.iter().any(|g| g.id == "mastery_a2"));
    }

    #[test]
    fn test_progress_counts_catalog() {
        let store = store_with_learner();
        let engine = AchievementEngine::new(&store);
        engine
            .check_and_grant("l-1", &stats_with_lessons(1))
            .unwrap();

        let progress = engine.progress("l-1").unwrap();
        assert_eq!(progress.unlocked.len(), 1);
        assert_eq!(progress.total, CATALOG.len() as u32);
    }

    #[test]
    fn test_progress_skips_unknown_catalog_ids() {
        let store = store_with_learner();
        store
            .grant_achievement("l-1", &UnlockedAchievement::new("retired_badge"))
            .unwrap();

        let progress = AchievementEngine::new(&store).progress("l-1").unwrap();
        assert!(progress.unlocked.is_empty());
    }

    #[test]
    fn test_check_for_unknown_learner_fails_open_on_read() {
        // The read path degrades to an empty set, but the grant still
        // needs a profile to write into.
        let store = MemoryStore::new();
        let result = AchievementEngine::new(&store).check_and_grant("ghost", &stats_with_lessons(1));
        assert!(result.is_err());
    }
}
