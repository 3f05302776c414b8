//! Storage traits for exercises, attempts, profiles, and lesson progress.
//!
//! The engine is generic over one storage bundle implementing all four
//! traits. Method names carry their domain noun so a single type can
//! implement every trait without call-site ambiguity.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::{
    Attempt, CefrLevel, Exercise, LearnerProfile, Lesson, LevelCompletion, UnlockedAchievement,
};
use crate::error::Result;

/// Persistence for exercise definitions.
pub trait ExerciseStore: Send + Sync {
    /// Retrieve an exercise by ID.
    ///
    /// Returns `Ok(None)` if the exercise doesn't exist.
    fn get_exercise(&self, id: &str) -> Result<Option<Exercise>>;

    /// Save an exercise, creating or replacing it.
    fn put_exercise(&self, exercise: &Exercise) -> Result<()>;

    /// Delete an exercise.
    ///
    /// Returns `Ok(())` even if the exercise doesn't exist.
    fn delete_exercise(&self, id: &str) -> Result<()>;
}

/// Append-only attempt history.
pub trait AttemptStore: Send + Sync {
    /// Append a graded attempt. Attempts are never overwritten.
    fn record_attempt(&self, attempt: &Attempt) -> Result<()>;

    /// All attempts by a learner, oldest first.
    fn attempts_for_learner(&self, learner_id: &str) -> Result<Vec<Attempt>>;
}

/// Persistence for learner profiles.
///
/// `add_xp` and `grant_achievement` are the concurrency-sensitive
/// operations: implementations must make the read-modify-write atomic
/// (a relational backend maps `add_xp` to an atomic UPDATE and
/// `grant_achievement` to a uniqueness constraint).
pub trait ProfileStore: Send + Sync {
    /// Retrieve a profile by learner ID.
    ///
    /// Returns `Ok(None)` if the learner has no profile yet.
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>>;

    /// Retrieve a profile, creating a fresh one if absent.
    fn get_or_create_profile(&self, learner_id: &str, language: &str) -> Result<LearnerProfile>;

    /// Save a profile, creating or replacing it.
    fn put_profile(&self, profile: &LearnerProfile) -> Result<()>;

    /// Atomically add XP to a profile and return the new total.
    ///
    /// Fails with `NotFound` if the profile doesn't exist.
    fn add_xp(&self, learner_id: &str, amount: u64) -> Result<u64>;

    /// Set the persisted level.
    fn set_level(&self, learner_id: &str, level: CefrLevel) -> Result<()>;

    /// Set the streak counter and last-activity date together.
    fn set_streak(&self, learner_id: &str, streak_days: u32, last_activity: NaiveDate)
        -> Result<()>;

    /// Record an unlocked achievement if not already present.
    ///
    /// Returns `true` when this call inserted it, `false` when the
    /// learner already had it. Concurrent duplicate grants must
    /// collapse to a single insert.
    fn grant_achievement(
        &self,
        learner_id: &str,
        achievement: &UnlockedAchievement,
    ) -> Result<bool>;

    /// The learner's unlocked achievements.
    ///
    /// Returns an empty list for an unknown learner.
    fn achievements(&self, learner_id: &str) -> Result<Vec<UnlockedAchievement>>;
}

/// Lesson registry and per-learner completion tracking.
pub trait LessonProgressStore: Send + Sync {
    /// Register a lesson, creating or replacing it.
    fn put_lesson(&self, lesson: &Lesson) -> Result<()>;

    /// Retrieve a registered lesson by ID.
    fn get_lesson(&self, id: &str) -> Result<Option<Lesson>>;

    /// Mark a lesson completed by a learner.
    ///
    /// Returns `true` only on the first completion; repeats are no-ops
    /// so completion XP is awarded once.
    fn mark_completed(&self, learner_id: &str, lesson_id: &str, perfect: bool) -> Result<bool>;

    /// Completion counts for a learner at one level and language.
    ///
    /// The total counts registered lessons at that level/language; the
    /// completed count is the subset the learner has finished.
    fn level_completion(
        &self,
        learner_id: &str,
        language: &str,
        level: CefrLevel,
    ) -> Result<LevelCompletion>;

    /// Total lessons the learner has completed.
    fn lessons_completed(&self, learner_id: &str) -> Result<u32>;

    /// Lessons the learner completed with a perfect score.
    fn perfect_lessons(&self, learner_id: &str) -> Result<u32>;
}

/// Blanket implementations for Arc-wrapped stores, so one shared store
/// can back tests and commands.
impl<T: ExerciseStore + ?Sized> ExerciseStore for Arc<T> {
    fn get_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        (**self).get_exercise(id)
    }

    fn put_exercise(&self, exercise: &Exercise) -> Result<()> {
        (**self).put_exercise(exercise)
    }

    fn delete_exercise(&self, id: &str) -> Result<()> {
        (**self).delete_exercise(id)
    }
}

impl<T: AttemptStore + ?Sized> AttemptStore for Arc<T> {
    fn record_attempt(&self, attempt: &Attempt) -> Result<()> {
        (**self).record_attempt(attempt)
    }

    fn attempts_for_learner(&self, learner_id: &str) -> Result<Vec<Attempt>> {
        (**self).attempts_for_learner(learner_id)
    }
}

impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>> {
        (**self).get_profile(learner_id)
    }

    fn get_or_create_profile(&self, learner_id: &str, language: &str) -> Result<LearnerProfile> {
        (**self).get_or_create_profile(learner_id, language)
    }

    fn put_profile(&self, profile: &LearnerProfile) -> Result<()> {
        (**self).put_profile(profile)
    }

    fn add_xp(&self, learner_id: &str, amount: u64) -> Result<u64> {
        (**self).add_xp(learner_id, amount)
    }

    fn set_level(&self, learner_id: &str, level: CefrLevel) -> Result<()> {
        (**self).set_level(learner_id, level)
    }

    fn set_streak(
        &self,
        learner_id: &str,
        streak_days: u32,
        last_activity: NaiveDate,
    ) -> Result<()> {
        (**self).set_streak(learner_id, streak_days, last_activity)
    }

    fn grant_achievement(
        &self,
        learner_id: &str,
        achievement: &UnlockedAchievement,
    ) -> Result<bool> {
        (**self).grant_achievement(learner_id, achievement)
    }

    fn achievements(&self, learner_id: &str) -> Result<Vec<UnlockedAchievement>> {
        (**self).achievements(learner_id)
    }
}

impl<T: LessonProgressStore + ?Sized> LessonProgressStore for Arc<T> {
    fn put_lesson(&self, lesson: &Lesson) -> Result<()> {
        (**self).put_lesson(lesson)
    }

    fn get_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        (**self).get_lesson(id)
    }

    fn mark_completed(&self, learner_id: &str, lesson_id: &str, perfect: bool) -> Result<bool> {
        (**self).mark_completed(learner_id, lesson_id, perfect)
    }

    fn level_completion(
        &self,
        learner_id: &str,
        language: &str,
        level: CefrLevel,
    ) -> Result<LevelCompletion> {
        (**self).level_completion(learner_id, language, level)
    }

    fn lessons_completed(&self, learner_id: &str) -> Result<u32> {
        (**self).lessons_completed(learner_id)
    }

    fn perfect_lessons(&self, learner_id: &str) -> Result<u32> {
        (**self).perfect_lessons(learner_id)
    }
}

/// Contract tests shared by every storage backend.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::ExerciseKind;
    use serde_json::json;

    /// Exercise CRUD behavior every backend must satisfy.
    pub fn test_exercise_store_crud<S: ExerciseStore>(store: &S) {
        let exercise = Exercise::new(
            "contract-ex",
            "contract-lesson",
            "Pick one",
            ExerciseKind::Selection,
            json!({"question": "q", "options": ["a", "b"]}),
            json!({"answers": [0]}),
            10,
        );

        assert!(store.get_exercise(&exercise.id).unwrap().is_none());

        store.put_exercise(&exercise).unwrap();
        let retrieved = store.get_exercise(&exercise.id).unwrap().unwrap();
        assert_eq!(retrieved.id, exercise.id);
        assert_eq!(retrieved.kind, exercise.kind);
        assert_eq!(retrieved.answer_key, exercise.answer_key);

        store.delete_exercise(&exercise.id).unwrap();
        assert!(store.get_exercise(&exercise.id).unwrap().is_none());

        // Deleting again is fine
        store.delete_exercise(&exercise.id).unwrap();
    }

    /// Attempt history must append and preserve order.
    pub fn test_attempt_store_appends<S: AttemptStore>(store: &S) {
        assert!(store.attempts_for_learner("contract-l").unwrap().is_empty());

        let first = Attempt::new("ex-1", "contract-l", json!([0]), 10, true);
        let second = Attempt::new("ex-1", "contract-l", json!([1]), 0, false);
        store.record_attempt(&first).unwrap();
        store.record_attempt(&second).unwrap();

        let attempts = store.attempts_for_learner("contract-l").unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].submitted, json!([0]));
        assert_eq!(attempts[1].submitted, json!([1]));

        assert!(store.attempts_for_learner("someone-else").unwrap().is_empty());
    }

    /// Profile lifecycle, atomic XP, and idempotent grants.
    pub fn test_profile_store_contract<S: ProfileStore>(store: &S) {
        assert!(store.get_profile("contract-p").unwrap().is_none());
        assert!(store.achievements("contract-p").unwrap().is_empty());
        assert!(store.add_xp("contract-p", 5).is_err());

        let created = store.get_or_create_profile("contract-p", "es").unwrap();
        assert_eq!(created.total_xp, 0);
        assert_eq!(created.language, "es");

        // Re-fetching returns the same profile, not a fresh one
        store.add_xp("contract-p", 10).unwrap();
        let again = store.get_or_create_profile("contract-p", "es").unwrap();
        assert_eq!(again.total_xp, 10);

        assert_eq!(store.add_xp("contract-p", 15).unwrap(), 25);

        store.set_level("contract-p", CefrLevel::A2).unwrap();
        store
            .set_streak(
                "contract-p",
                3,
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            )
            .unwrap();

        let unlocked = UnlockedAchievement::new("first_lesson");
        assert!(store.grant_achievement("contract-p", &unlocked).unwrap());
        assert!(!store.grant_achievement("contract-p", &unlocked).unwrap());

        let profile = store.get_profile("contract-p").unwrap().unwrap();
        assert_eq!(profile.total_xp, 25);
        assert_eq!(profile.level, CefrLevel::A2);
        assert_eq!(profile.streak_days, 3);
        assert_eq!(
            profile.last_activity,
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
        assert_eq!(store.achievements("contract-p").unwrap().len(), 1);
    }

    /// Lesson registry and completion counting.
    pub fn test_lesson_progress_contract<S: LessonProgressStore>(store: &S) {
        store
            .put_lesson(&Lesson::new("cl-1", "One", "es", CefrLevel::A1))
            .unwrap();
        store
            .put_lesson(&Lesson::new("cl-2", "Two", "es", CefrLevel::A1))
            .unwrap();
        store
            .put_lesson(&Lesson::new("cl-3", "Three", "fr", CefrLevel::A1))
            .unwrap();

        assert!(store.get_lesson("cl-1").unwrap().is_some());
        assert!(store.get_lesson("missing").unwrap().is_none());

        let before = store
            .level_completion("contract-l", "es", CefrLevel::A1)
            .unwrap();
        assert_eq!(before, LevelCompletion { completed: 0, total: 2 });

        assert!(store.mark_completed("contract-l", "cl-1", true).unwrap());
        // Second completion of the same lesson does not count again
        assert!(!store.mark_completed("contract-l", "cl-1", false).unwrap());
        assert!(store.mark_completed("contract-l", "cl-2", false).unwrap());

        let after = store
            .level_completion("contract-l", "es", CefrLevel::A1)
            .unwrap();
        assert_eq!(after, LevelCompletion { completed: 2, total: 2 });
        assert!(after.is_exhausted());

        // The French lesson belongs to a different language bucket
        let fr = store
            .level_completion("contract-l", "fr", CefrLevel::A1)
            .unwrap();
        assert_eq!(fr, LevelCompletion { completed: 0, total: 1 });

        assert_eq!(store.lessons_completed("contract-l").unwrap(), 2);
        assert_eq!(store.perfect_lessons("contract-l").unwrap(), 1);
        assert_eq!(store.lessons_completed("nobody").unwrap(), 0);
    }
}
