//! XP accounting and level advancement.
//!
//! XP only ever goes up; a negative award is rejected rather than
//! clamped so a buggy caller surfaces instead of silently draining
//! nothing. Level advancement is driven by lesson exhaustion, not raw
//! XP: a learner moves up only once every registered lesson at their
//! current level and language is completed. XP thresholds stay a
//! display concern (see [`crate::core::level_for_xp`]).

use serde::Serialize;
use tracing::{debug, info};

use crate::core::{CefrLevel, LevelCompletion};
use crate::error::{EngineError, Result};
use crate::storage::{LessonProgressStore, ProfileStore};

/// Outcome of one XP award.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct XpAward {
    /// XP granted by this award.
    pub granted: u64,
    /// Learner's total XP after the award.
    pub total_xp: u64,
    /// Level before the advancement check.
    pub previous_level: CefrLevel,
    /// Level after the advancement check.
    pub new_level: CefrLevel,
    /// Whether the learner advanced.
    pub leveled_up: bool,
    /// Completion counts at the level that was checked.
    pub level_completion: LevelCompletion,
}

/// Applies XP awards and the advancement rule against a store.
pub struct ProgressionLedger<'a, S> {
    store: &'a S,
}

impl<'a, S: ProfileStore + LessonProgressStore> ProgressionLedger<'a, S> {
    /// Create a ledger over a storage bundle.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Award XP to a learner and run the advancement check.
    ///
    /// The profile must already exist. The XP add goes through the
    /// store's atomic `add_xp`; the advancement check then reads the
    /// completion counts for the learner's current level and advances
    /// to the next level when every lesson there is completed. At C2
    /// there is nowhere left to advance.
    pub fn award_xp(&self, learner_id: &str, amount: i64) -> Result<XpAward> {
        if amount < 0 {
            return Err(EngineError::validation(
                "xp",
                format!("XP award cannot be negative (got {})", amount),
            ));
        }
        let granted = amount as u64;

        let profile = self
            .store
            .get_profile(learner_id)?
            .ok_or_else(|| EngineError::not_found("profile", learner_id))?;
        let previous_level = profile.level;

        let total_xp = self.store.add_xp(learner_id, granted)?;
        debug!(learner_id, granted, total_xp, "awarded XP");

        let level_completion =
            self.store
                .level_completion(learner_id, &profile.language, previous_level)?;

        let mut new_level = previous_level;
        if level_completion.is_exhausted() {
            if let Some(next) = previous_level.next() {
                self.store.set_level(learner_id, next)?;
                new_level = next;
                info!(
                    learner_id,
                    from = previous_level.as_str(),
                    to = next.as_str(),
                    "level advanced"
                );
            }
        }

        Ok(XpAward {
            granted,
            total_xp,
            previous_level,
            new_level,
            leveled_up: new_level != previous_level,
            level_completion,
        })
    }
}
