//! CEFR proficiency levels and the XP threshold table.
//!
//! Two level rules coexist in the platform. The persisted level only
//! advances through lesson exhaustion (see `progression::ledger`); the
//! XP threshold mapping here is a pure display helper used for the
//! profile's "progress toward next level" bar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Ordered CEFR proficiency tier. `A1 < A2 < B1 < B2 < C1 < C2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum CefrLevel {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// All levels in ascending order.
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// The next level up, or `None` at C2.
    pub fn next(self) -> Option<CefrLevel> {
        match self {
            CefrLevel::A1 => Some(CefrLevel::A2),
            CefrLevel::A2 => Some(CefrLevel::B1),
            CefrLevel::B1 => Some(CefrLevel::B2),
            CefrLevel::B2 => Some(CefrLevel::C1),
            CefrLevel::C1 => Some(CefrLevel::C2),
            CefrLevel::C2 => None,
        }
    }

    /// String form used in storage and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }

    /// Minimum cumulative XP for this level per the threshold table.
    pub fn xp_threshold(self) -> u64 {
        LEVEL_THRESHOLDS
            .iter()
            .find(|(level, _)| *level == self)
            .map(|(_, xp)| *xp)
            .unwrap_or(0)
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(EngineError::config(format!("unknown CEFR level: {other}"))),
        }
    }
}

/// Ordered (level, minimum cumulative XP) pairs.
pub const LEVEL_THRESHOLDS: &[(CefrLevel, u64)] = &[
    (CefrLevel::A1, 0),
    (CefrLevel::A2, 100),
    (CefrLevel::B1, 300),
    (CefrLevel::B2, 600),
    (CefrLevel::C1, 1000),
    (CefrLevel::C2, 1500),
];

/// Map a raw XP total to a CEFR level via the threshold table.
///
/// Pure display helper; never drives the persisted level.
pub fn level_for_xp(xp_total: u64) -> CefrLevel {
    for (level, threshold) in LEVEL_THRESHOLDS.iter().rev() {
        if xp_total >= *threshold {
            return *level;
        }
    }
    CefrLevel::A1
}

/// Progress from the learner's persisted level toward the next one,
/// expressed against the XP threshold table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// The learner's current (persisted) level.
    pub current: CefrLevel,
    /// The next level, or `None` at C2.
    pub next: Option<CefrLevel>,
    /// Percent of the XP span to the next level already covered (0-100).
    pub percent: u8,
    /// XP remaining until the next level's threshold (0 at C2 or past it).
    pub xp_to_next: u64,
}

/// Compute display progress toward the next level.
///
/// Progress is measured over the span between the current level's
/// threshold and the next level's threshold, clamped to 100%.
pub fn progress_toward_next(current: CefrLevel, xp_total: u64) -> LevelProgress {
    let next = current.next();

    let Some(next_level) = next else {
        return LevelProgress {
            current,
            next: None,
            percent: 100,
            xp_to_next: 0,
        };
    };

    let floor = current.xp_threshold();
    let ceiling = next_level.xp_threshold();
    let span = ceiling.saturating_sub(floor).max(1);
    let covered = xp_total.saturating_sub(floor).min(span);

    LevelProgress {
        current,
        next,
        percent: ((covered * 100) / span) as u8,
        xp_to_next: ceiling.saturating_sub(xp_total),
    }
}
