//! Lesson registry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::CefrLevel;

/// A registered lesson.
///
/// Lessons anchor level-completion counting: the total for a level is
/// the number of registered lessons at that level and language, and a
/// learner masters the level once all of them are completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique lesson identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Target language code (e.g. "es", "fr").
    pub language: String,
    /// CEFR level the lesson belongs to.
    pub level: CefrLevel,
    /// When the lesson was registered.
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// Create a lesson record timestamped now.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        language: impl Into<String>,
        level: CefrLevel,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            language: language.into(),
            level,
            created_at: Utc::now(),
        }
    }
}
