//! Engine orchestration: grading, lesson completion, and profile reads.
//!
//! The engine wires the validators, scoring, ledger, streak tracker,
//! and achievement engine over a single storage bundle. Grading always
//! records the attempt; XP, streak, and achievement side effects hang
//! off it but a failed achievement read never blocks the grade itself.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::core::{
    progress_toward_next, AggregateStats, Attempt, CefrLevel, Exercise, LearnerProfile, Lesson,
    LevelProgress,
};
use crate::error::{EngineError, Result};
use crate::grading::{score_outcome, validator_for};
use crate::progression::{
    AchievementEngine, AchievementProgress, GrantedAchievement, ProgressionLedger, StreakTracker,
    StreakUpdate, XpAward,
};
use crate::storage::{AttemptStore, ExerciseStore, LessonProgressStore, ProfileStore};

/// Language assigned to profiles created implicitly by an engine call.
pub const DEFAULT_LANGUAGE: &str = "es";

/// The wire-format grade report returned to clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    /// Whether the submission fully satisfied the exercise.
    pub correct: bool,
    /// Points earned.
    pub score: u32,
    /// Point ceiling for the exercise.
    pub max_score: u32,
    /// The submission, echoed back.
    pub submitted_answers: Value,
    /// The correct answers; null for writing exercises.
    pub correct_answers: Value,
    /// Explanation text from the exercise content, empty when absent.
    pub explanation: String,
    /// Exercise type tag.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Everything a grading call produced.
#[derive(Debug, Clone, Serialize)]
pub struct GradeOutcome {
    /// The wire-format report.
    pub report: GradeReport,
    /// XP awarded for the score, when the score was above zero.
    pub xp: Option<XpAward>,
    /// Achievements newly unlocked by this attempt.
    pub achievements: Vec<GrantedAchievement>,
}

/// Everything a lesson-completion call produced.
#[derive(Debug, Clone, Serialize)]
pub struct LessonOutcome {
    /// Whether this was the first completion of the lesson.
    pub newly_completed: bool,
    /// XP awarded; `None` on a repeat completion.
    pub xp: Option<XpAward>,
    /// Streak update; `None` on a repeat completion.
    pub streak: Option<StreakUpdate>,
    /// Achievements newly unlocked.
    pub achievements: Vec<GrantedAchievement>,
}

/// A learner profile joined with its display progress.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    /// The stored profile.
    pub profile: LearnerProfile,
    /// XP progress toward the next level.
    pub level_progress: LevelProgress,
    /// Unlocked achievements against the catalog.
    pub achievements: AchievementProgress,
}

/// Orchestrates grading and progression over one storage bundle.
pub struct Engine<S> {
    store: S,
    config: Config,
}

impl<S> Engine<S>
where
    S: ExerciseStore + AttemptStore + ProfileStore + LessonProgressStore,
{
    /// Create an engine over a store with the given configuration.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// The underlying storage bundle.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Grade a submission against a stored exercise.
    ///
    /// The attempt is recorded whatever the score. A score above zero
    /// awards that many XP and runs the achievement check; a zero
    /// score leaves the profile untouched.
    pub fn grade(
        &self,
        exercise_id: &str,
        learner_id: &str,
        submitted: Value,
    ) -> Result<GradeOutcome> {
        let exercise = self
            .store
            .get_exercise(exercise_id)?
            .ok_or_else(|| EngineError::not_found("exercise", exercise_id))?;
        if !exercise.is_active() {
            return Err(EngineError::validation(
                exercise.kind.as_str(),
                format!("exercise {} is retired", exercise.id),
            ));
        }

        let outcome =
            validator_for(exercise.kind).validate(&exercise, &submitted, &self.config.grading)?;
        let scored = score_outcome(&outcome, exercise.max_points)?;
        debug!(
            exercise_id,
            learner_id,
            score = scored.score,
            correct = scored.correct,
            "graded submission"
        );

        let attempt = Attempt::new(
            exercise_id,
            learner_id,
            submitted.clone(),
            scored.score,
            scored.correct,
        );
        self.store.record_attempt(&attempt)?;

        let mut xp = None;
        let mut achievements = Vec::new();
        if scored.score > 0 {
            let profile = self
                .store
                .get_or_create_profile(learner_id, DEFAULT_LANGUAGE)?;
            xp = Some(
                ProgressionLedger::new(&self.store)
                    .award_xp(learner_id, i64::from(scored.score))?,
            );
            let stats = self.aggregate_stats_for(learner_id, &profile.language)?;
            achievements = AchievementEngine::new(&self.store).check_and_grant(learner_id, &stats)?;
        }

        Ok(GradeOutcome {
            report: build_report(&exercise, submitted, scored.score, scored.correct),
            xp,
            achievements,
        })
    }

    /// Record a lesson completion.
    ///
    /// Only the first completion has side effects: lesson XP, a streak
    /// update, a perfect-lesson mark when `percent` is 100, and an
    /// achievement check. Repeats return `newly_completed: false` and
    /// change nothing.
    pub fn complete_lesson(
        &self,
        learner_id: &str,
        lesson_id: &str,
        level: CefrLevel,
        percent: u32,
    ) -> Result<LessonOutcome> {
        if percent > 100 {
            return Err(EngineError::validation(
                "lesson",
                format!("completion percent must be 0..=100 (got {})", percent),
            ));
        }

        let profile = self
            .store
            .get_or_create_profile(learner_id, DEFAULT_LANGUAGE)?;

        // Register unknown lessons so level-completion totals include them
        if self.store.get_lesson(lesson_id)?.is_none() {
            self.store
                .put_lesson(&Lesson::new(lesson_id, lesson_id, &profile.language, level))?;
        }

        let newly_completed = self
            .store
            .mark_completed(learner_id, lesson_id, percent == 100)?;
        if !newly_completed {
            return Ok(LessonOutcome {
                newly_completed: false,
                xp: None,
                streak: None,
                achievements: Vec::new(),
            });
        }

        let streak = StreakTracker::new(&self.store)
            .record_activity(learner_id, Utc::now().date_naive())?;
        let xp = ProgressionLedger::new(&self.store)
            .award_xp(learner_id, i64::from(self.config.xp.lesson_completed))?;

        let stats = self.aggregate_stats_for(learner_id, &profile.language)?;
        let achievements =
            AchievementEngine::new(&self.store).check_and_grant(learner_id, &stats)?;

        Ok(LessonOutcome {
            newly_completed: true,
            xp: Some(xp),
            streak: Some(streak),
            achievements,
        })
    }

    /// A learner's profile joined with display progress.
    ///
    /// Unlike the mutation paths this never creates a profile; an
    /// unknown learner is `NotFound`.
    pub fn profile(&self, learner_id: &str) -> Result<ProfileView> {
        let profile = self
            .store
            .get_profile(learner_id)?
            .ok_or_else(|| EngineError::not_found("profile", learner_id))?;
        let level_progress = progress_toward_next(profile.level, profile.total_xp);
        let achievements = AchievementEngine::new(&self.store).progress(learner_id)?;
        Ok(ProfileView {
            profile,
            level_progress,
            achievements,
        })
    }

    /// A learner's unlocked achievements against the catalog.
    pub fn achievement_progress(&self, learner_id: &str) -> Result<AchievementProgress> {
        AchievementEngine::new(&self.store).progress(learner_id)
    }

    /// Snapshot the aggregate stats the achievement rules evaluate.
    fn aggregate_stats_for(&self, learner_id: &str, language: &str) -> Result<AggregateStats> {
        let profile = self
            .store
            .get_profile(learner_id)?
            .ok_or_else(|| EngineError::not_found("profile", learner_id))?;

        let mut stats = AggregateStats {
            lessons_completed: self.store.lessons_completed(learner_id)?,
            total_xp: profile.total_xp,
            streak_days: profile.streak_days,
            perfect_lessons: self.store.perfect_lessons(learner_id)?,
            ..Default::default()
        };
        for level in CefrLevel::ALL {
            stats
                .level_completion
                .insert(level, self.store.level_completion(learner_id, language, level)?);
        }
        Ok(stats)
    }
}

fn build_report(exercise: &Exercise, submitted: Value, score: u32, correct: bool) -> GradeReport {
    let correct_answers = exercise
        .answer_key
        .get("answers")
        .cloned()
        .unwrap_or(Value::Null);
    GradeReport {
        correct,
        score,
        max_score: exercise.max_points,
        submitted_answers: submitted,
        correct_answers,
        explanation: exercise.explanation(),
        kind: exercise.kind.as_str().to_string(),
    }
}
