//! Daily activity streak tracking.
//!
//! The streak counts consecutive calendar days with activity, using
//! date-only arithmetic so time zones and times of day never split a
//! day in two. A second event on the same day is a no-op, a one-day
//! gap extends the streak, and any longer gap restarts it at one. A
//! backdated event (before the recorded last activity) is logged and
//! ignored; the streak never decrements.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::storage::ProfileStore;

/// Outcome of one activity event.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StreakUpdate {
    /// Streak length before the event.
    pub previous: u32,
    /// Streak length after the event.
    pub current: u32,
    /// Whether the counter changed.
    pub changed: bool,
}

/// What a single activity event does to a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// First ever activity, or the streak restarts at one.
    Restart,
    /// Activity on the day after the last one.
    Extend,
    /// Same-day repeat or backdated event.
    Unchanged,
}

fn classify(last_activity: Option<NaiveDate>, today: NaiveDate) -> Transition {
    let Some(last) = last_activity else {
        return Transition::Restart;
    };
    match (today - last).num_days() {
        0 => Transition::Unchanged,
        1 => Transition::Extend,
        gap if gap < 0 => {
            warn!(%last, %today, "backdated activity event ignored");
            Transition::Unchanged
        }
        _ => Transition::Restart,
    }
}

/// Applies activity events to a learner's streak.
pub struct StreakTracker<'a, S> {
    store: &'a S,
}

impl<'a, S: ProfileStore> StreakTracker<'a, S> {
    /// Create a tracker over a profile store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record activity for `today` and persist the resulting streak.
    ///
    /// The profile must already exist. Only extending or restarting
    /// writes to the store; same-day repeats leave `last_activity`
    /// untouched.
    pub fn record_activity(&self, learner_id: &str, today: NaiveDate) -> Result<StreakUpdate> {
        let profile = self
            .store
            .get_profile(learner_id)?
            .ok_or_else(|| EngineError::not_found("profile", learner_id))?;
        let previous = profile.streak_days;

        let current = match classify(profile.last_activity, today) {
            Transition::Unchanged => {
                return Ok(StreakUpdate {
                    previous,
                    current: previous,
                    changed: false,
                })
            }
            Transition::Extend => previous + 1,
            Transition::Restart => 1,
        };

        self.store.set_streak(learner_id, current, today)?;
        debug!(learner_id, previous, current, "streak updated");

        Ok(StreakUpdate {
            previous,
            current,
            changed: current != previous,
        })
    }
}
