//! In-memory storage backend.
//!
//! Thread-safe `RwLock<HashMap>` maps behind every trait. Used by unit
//! tests and as a scratch backend; everything is lost on drop.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::core::{
    Attempt, CefrLevel, Exercise, LearnerProfile, Lesson, LevelCompletion, UnlockedAchievement,
};
use crate::error::{EngineError, Result};
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// In-memory implementation of all four storage traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    exercises: RwLock<HashMap<String, Exercise>>,
    attempts: RwLock<Vec<Attempt>>,
    profiles: RwLock<HashMap<String, LearnerProfile>>,
    lessons: RwLock<HashMap<String, Lesson>>,
    /// learner -> lesson -> completed perfectly
    completions: RwLock<HashMap<String, HashMap<String, bool>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_profile<T>(
        &self,
        learner_id: &str,
        f: impl FnOnce(&mut LearnerProfile) -> T,
    ) -> Result<T> {
        let mut profiles = self.profiles.write().unwrap();
        let profile = profiles
            .get_mut(learner_id)
            .ok_or_else(|| EngineError::not_found("profile", learner_id))?;
        let out = f(profile);
        profile.touch();
        Ok(out)
    }
}

impl ExerciseStore for MemoryStore {
    fn get_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        Ok(self.exercises.read().unwrap().get(id).cloned())
    }

    fn put_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.exercises
            .write()
            .unwrap()
            .insert(exercise.id.clone(), exercise.clone());
        Ok(())
    }

    fn delete_exercise(&self, id: &str) -> Result<()> {
        self.exercises.write().unwrap().remove(id);
        Ok(())
    }
}

impl AttemptStore for MemoryStore {
    fn record_attempt(&self, attempt: &Attempt) -> Result<()> {
        self.attempts.write().unwrap().push(attempt.clone());
        Ok(())
    }

    fn attempts_for_learner(&self, learner_id: &str) -> Result<Vec<Attempt>> {
        Ok(self
            .attempts
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

impl ProfileStore for MemoryStore {
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>> {
        Ok(self.profiles.read().unwrap().get(learner_id).cloned())
    }

    fn get_or_create_profile(&self, learner_id: &str, language: &str) -> Result<LearnerProfile> {
        let mut profiles = self.profiles.write().unwrap();
        Ok(profiles
            .entry(learner_id.to_string())
            .or_insert_with(|| LearnerProfile::new(learner_id, language))
            .clone())
    }

    fn put_profile(&self, profile: &LearnerProfile) -> Result<()> {
        self.profiles
            .write()
            .unwrap()
            .insert(profile.learner_id.clone(), profile.clone());
        Ok(())
    }

    fn add_xp(&self, learner_id: &str, amount: u64) -> Result<u64> {
        self.with_profile(learner_id, |p| {
            p.total_xp = p.total_xp.saturating_add(amount);
            p.total_xp
        })
    }

    fn set_level(&self, learner_id: &str, level: CefrLevel) -> Result<()> {
        self.with_profile(learner_id, |p| p.level = level)
    }

    fn set_streak(
        &self,
        learner_id: &str,
        streak_days: u32,
        last_activity: NaiveDate,
    ) -> Result<()> {
        self.with_profile(learner_id, |p| {
            p.streak_days = streak_days;
            p.last_activity = Some(last_activity);
        })
    }

    fn grant_achievement(
        &self,
        learner_id: &str,
        achievement: &UnlockedAchievement,
    ) -> Result<bool> {
        self.with_profile(learner_id, |p| {
            if p.has_achievement(&achievement.id) {
                false
            } else {
                p.achievements.push(achievement.clone());
                true
            }
        })
    }

    fn achievements(&self, learner_id: &str) -> Result<Vec<UnlockedAchievement>> {
        Ok(self
            .profiles
            .read()
            .unwrap()
            .get(learner_id)
            .map(|p| p.achievements.clone())
            .unwrap_or_default())
    }
}

impl LessonProgressStore for MemoryStore {
    fn put_lesson(&self, lesson: &Lesson) -> Result<()> {
        self.lessons
            .write()
            .unwrap()
            .insert(lesson.id.clone(), lesson.clone());
        Ok(())
    }

    fn get_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        Ok(self.lessons.read().unwrap().get(id).cloned())
    }

    fn mark_completed(&self, learner_id: &str, lesson_id: &str, perfect: bool) -> Result<bool> {
        let mut completions = self.completions.write().unwrap();
        let learner = completions.entry(learner_id.to_string()).or_default();
        if learner.contains_key(lesson_id) {
            return Ok(false);
        }
        learner.insert(lesson_id.to_string(), perfect);
        Ok(true)
    }

    fn level_completion(
        &self,
        learner_id: &str,
        language: &str,
        level: CefrLevel,
    ) -> Result<LevelCompletion> {
        let lessons = self.lessons.read().unwrap();
        let completions = self.completions.read().unwrap();
        let done = completions.get(learner_id);

        let mut completion = LevelCompletion::default();
        for lesson in lessons.values() {
            if lesson.level != level || lesson.language != language {
                continue;
            }
            completion.total += 1;
            if done.is_some_and(|d| d.contains_key(&lesson.id)) {
                completion.completed += 1;
            }
        }
        Ok(completion)
    }

    fn lessons_completed(&self, learner_id: &str) -> Result<u32> {
        Ok(self
            .completions
            .read()
            .unwrap()
            .get(learner_id)
            .map(|d| d.len() as u32)
            .unwrap_or(0))
    }

    fn perfect_lessons(&self, learner_id: &str) -> Result<u32> {
        Ok(self
            .completions
            .read()
            .unwrap()
            .get(learner_id)
            .map(|d| d.values().filter(|perfect| **perfect).count() as u32)
            .unwrap_or(0))
    }
}
