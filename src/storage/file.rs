//! File-based storage backend.
//!
//! Records live under a data directory as JSON documents, one per
//! exercise, lesson, and profile, plus one JSONL attempt log per
//! learner. Writes go through the temp file + rename pattern so a
//! crash never leaves a half-written document.
//!
//! Profile mutations (`add_xp`, `grant_achievement`, the setters) take
//! an internal lock around the read-modify-write cycle, which makes
//! them atomic within one process. A relational deployment must map
//! `add_xp` to an atomic UPDATE and `grant_achievement` to a
//! uniqueness constraint instead.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{
    Attempt, CefrLevel, Exercise, LearnerProfile, Lesson, LevelCompletion, UnlockedAchievement,
};
use crate::error::{EngineError, Result};
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// File-based implementation of all four storage traits.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
    /// Serializes profile and progress read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the layout if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        for sub in ["exercises", "lessons", "profiles", "progress", "attempts"] {
            let dir = data_dir.join(sub);
            if !dir.exists() {
                fs::create_dir_all(&dir).map_err(|e| EngineError::storage(&dir, e))?;
            }
        }
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn exercise_path(&self, id: &str) -> PathBuf {
        self.data_dir.join("exercises").join(format!("{}.json", id))
    }

    fn lesson_path(&self, id: &str) -> PathBuf {
        self.data_dir.join("lessons").join(format!("{}.json", id))
    }

    fn profile_path(&self, learner_id: &str) -> PathBuf {
        self.data_dir
            .join("profiles")
            .join(format!("{}.json", learner_id))
    }

    fn progress_path(&self, learner_id: &str) -> PathBuf {
        self.data_dir
            .join("progress")
            .join(format!("{}.json", learner_id))
    }

    fn attempts_path(&self, learner_id: &str) -> PathBuf {
        self.data_dir
            .join("attempts")
            .join(format!("{}.jsonl", learner_id))
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| EngineError::storage(path, e))?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn atomic_write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        let temp_path = path.with_extension("json.tmp");

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| EngineError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| EngineError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| EngineError::storage(&temp_path, e))?;
        }

        // Rename is atomic on POSIX
        fs::rename(&temp_path, path).map_err(|e| EngineError::storage(path, e))?;
        Ok(())
    }

    /// Load, mutate, and atomically rewrite a profile under the lock.
    fn update_profile<T>(
        &self,
        learner_id: &str,
        f: impl FnOnce(&mut LearnerProfile) -> T,
    ) -> Result<T> {
        let _guard = self.write_lock.lock().unwrap();
        let path = self.profile_path(learner_id);
        let mut profile: LearnerProfile = Self::read_json(&path)?
            .ok_or_else(|| EngineError::not_found("profile", learner_id))?;
        let out = f(&mut profile);
        profile.touch();
        Self::atomic_write(&path, &profile)?;
        Ok(out)
    }

    /// learner's lesson completions, lesson ID -> completed perfectly
    fn read_progress(&self, learner_id: &str) -> Result<HashMap<String, bool>> {
        Ok(Self::read_json(&self.progress_path(learner_id))?.unwrap_or_default())
    }
}

impl ExerciseStore for FileStore {
    fn get_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        Self::read_json(&self.exercise_path(id))
    }

    fn put_exercise(&self, exercise: &Exercise) -> Result<()> {
        Self::atomic_write(&self.exercise_path(&exercise.id), exercise)
    }

    fn delete_exercise(&self, id: &str) -> Result<()> {
        let path = self.exercise_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| EngineError::storage(&path, e))?;
        }
        Ok(())
    }
}

impl AttemptStore for FileStore {
    fn record_attempt(&self, attempt: &Attempt) -> Result<()> {
        let path = self.attempts_path(&attempt.learner_id);
        let line = serde_json::to_string(attempt)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| EngineError::storage(&path, e))?;
        writeln!(file, "{}", line).map_err(|e| EngineError::storage(&path, e))?;
        Ok(())
    }

    fn attempts_for_learner(&self, learner_id: &str) -> Result<Vec<Attempt>> {
        let path = self.attempts_path(learner_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| EngineError::storage(&path, e))?;
        let mut attempts = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            attempts.push(serde_json::from_str(line)?);
        }
        Ok(attempts)
    }
}

impl ProfileStore for FileStore {
    fn get_profile(&self, learner_id: &str) -> Result<Option<LearnerProfile>> {
        Self::read_json(&self.profile_path(learner_id))
    }

    fn get_or_create_profile(&self, learner_id: &str, language: &str) -> Result<LearnerProfile> {
        let _guard = self.write_lock.lock().unwrap();
        let path = self.profile_path(learner_id);
        if let Some(profile) = Self::read_json(&path)? {
            return Ok(profile);
        }
        let profile = LearnerProfile::new(learner_id, language);
        Self::atomic_write(&path, &profile)?;
        Ok(profile)
    }

    fn put_profile(&self, profile: &LearnerProfile) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap();
        Self::atomic_write(&self.profile_path(&profile.learner_id), profile)
    }

    fn add_xp(&self, learner_id: &str, amount: u64) -> Result<u64> {
        self.update_profile(learner_id, |p| {
            p.total_xp = p.total_xp.saturating_add(amount);
            p.total_xp
        })
    }

    fn set_level(&self, learner_id: &str, level: CefrLevel) -> Result<()> {
        self.update_profile(learner_id, |p| p.level = level)
    }

    fn set_streak(
        &self,
        learner_id: &str,
        streak_days: u32,
        last_activity: NaiveDate,
    ) -> Result<()> {
        self.update_profile(learner_id, |p| {
            p.streak_days = streak_days;
            p.last_activity = Some(last_activity);
        })
    }

    fn grant_achievement(
        &self,
        learner_id: &str,
        achievement: &UnlockedAchievement,
    ) -> Result<bool> {
        self.update_profile(learner_id, |p| {
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
            .get_profile(learner_id)?
            .map(|p| p.achievements)
            .unwrap_or_default())
    }
}

impl LessonProgressStore for FileStore {
    fn put_lesson(&self, lesson: &Lesson) -> Result<()> {
        Self::atomic_write(&self.lesson_path(&lesson.id), lesson)
    }

    fn get_lesson(&self, id: &str) -> Result<Option<Lesson>> {
        Self::read_json(&self.lesson_path(id))
    }

    fn mark_completed(&self, learner_id: &str, lesson_id: &str, perfect: bool) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap();
        let path = self.progress_path(learner_id);
        let mut progress: HashMap<String, bool> =
            Self::read_json(&path)?.unwrap_or_default();
        if progress.contains_key(lesson_id) {
            return Ok(false);
        }
        progress.insert(lesson_id.to_string(), perfect);
        Self::atomic_write(&path, &progress)?;
        Ok(true)
    }

    fn level_completion(
        &self,
        learner_id: &str,
        language: &str,
        level: CefrLevel,
    ) -> Result<LevelCompletion> {
        let done = self.read_progress(learner_id)?;
        let lessons_dir = self.data_dir.join("lessons");

        let mut completion = LevelCompletion::default();
        let entries =
            fs::read_dir(&lessons_dir).map_err(|e| EngineError::storage(&lessons_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| EngineError::storage(&lessons_dir, e))?;
            let path = entry.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(lesson) = Self::read_json::<Lesson>(&path)? else {
                continue;
            };
            if lesson.level != level || lesson.language != language {
                continue;
            }
            completion.total += 1;
            if done.contains_key(&lesson.id) {
                completion.completed += 1;
            }
        }
        Ok(completion)
    }

    fn lessons_completed(&self, learner_id: &str) -> Result<u32> {
        Ok(self.read_progress(learner_id)?.len() as u32)
    }

    fn perfect_lessons(&self, learner_id: &str) -> Result<u32> {
        Ok(self
            .read_progress(learner_id)?
            .values()
            .filter(|perfect| **perfect)
            .count() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::{
        test_attempt_store_appends, test_exercise_store_crud,
        test_lesson_progress_contract as lesson_progress_contract, test_profile_store_contract,
    };
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_open_creates_layout() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("data");
        assert!(!root.exists());

        let _store = FileStore::open(&root).unwrap();

        for sub in ["exercises", "lessons", "profiles", "progress", "attempts"] {
            assert!(root.join(sub).is_dir());
        }
    }

    #[test]
    fn test_exercise_contract() {
        let (store, _dir) = create_test_store();
        test_exercise_store_crud(&store);
    }

    #[test]
    fn test_attempt_contract() {
        let (store, _dir) = create_test_store();
        test_attempt_store_appends(&store);
    }

    #[test]
    fn test_profile_contract() {
        let (store, _dir) = create_test_store();
        test_profile_store_contract(&store);
    }

    #[test]
    fn test_lesson_progress_contract() {
        let (store, _dir) = create_test_store();
        lesson_progress_contract(&store);
    }

    #[test]
    fn test_profile_written_as_valid_json() {
        let (store, _dir) = create_test_store();
        store.get_or_create_profile("l-1", "es").unwrap();

        let content = fs::read_to_string(store.profile_path("l-1")).unwrap();
        let parsed: LearnerProfile = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.learner_id, "l-1");
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (store, _dir) = create_test_store();
        store.get_or_create_profile("l-1", "es").unwrap();
        store.add_xp("l-1", 10).unwrap();

        let temp = store.profile_path("l-1").with_extension("json.tmp");
        assert!(!temp.exists());
    }

    #[test]
    fn test_attempts_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            let attempt = Attempt::new("ex-1", "l-1", serde_json::json!([0]), 10, true);
            store.record_attempt(&attempt).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        let attempts = store.attempts_for_learner("l-1").unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].exercise_id, "ex-1");
    }

    #[test]
    fn test_add_xp_missing_profile() {
        let (store, _dir) = create_test_store();
        let err = store.add_xp("ghost", 10).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
