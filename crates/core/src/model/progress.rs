use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::LessonId;

/// Persisted completion and bookmark state for a learner.
///
/// Serialized as one JSON object with camelCase keys (`completedLessons`,
/// `currentLesson`, `lastAccessed`), the shape the progress store has always
/// written. A lesson is complete exactly when its id is a member of
/// `completed_lessons`; there is no separate status field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    completed_lessons: BTreeSet<LessonId>,
    current_lesson: Option<LessonId>,
    last_accessed: DateTime<Utc>,
}

impl ProgressRecord {
    /// The record a learner starts with before anything is persisted.
    #[must_use]
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            completed_lessons: BTreeSet::new(),
            current_lesson: None,
            last_accessed: now,
        }
    }

    /// Adds a lesson to the completed set.
    ///
    /// Idempotent: returns `true` only when the set actually changed, so
    /// callers can skip persisting a no-op.
    pub fn mark_complete(&mut self, lesson: LessonId) -> bool {
        self.completed_lessons.insert(lesson)
    }

    /// Unconditionally overwrites the current-lesson bookmark.
    pub fn set_current(&mut self, lesson: LessonId) {
        self.current_lesson = Some(lesson);
    }

    /// Pure membership check, no side effects.
    #[must_use]
    pub fn is_complete(&self, lesson: &LessonId) -> bool {
        self.completed_lessons.contains(lesson)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&LessonId> {
        self.current_lesson.as_ref()
    }

    #[must_use]
    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed
    }

    /// Rewrites the access timestamp; called on every persisted mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed = now;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn mark_complete_is_idempotent() {
        let mut record = ProgressRecord::empty(fixed_now());
        assert!(record.mark_complete(LessonId::new("lesson-1")));
        assert!(!record.mark_complete(LessonId::new("lesson-1")));
        assert_eq!(record.completed_count(), 1);
    }

    #[test]
    fn membership_reflects_only_marked_lessons() {
        let mut record = ProgressRecord::empty(fixed_now());
        record.mark_complete(LessonId::new("lesson-1"));
        record.mark_complete(LessonId::new("lesson-3"));

        assert!(record.is_complete(&LessonId::new("lesson-1")));
        assert!(!record.is_complete(&LessonId::new("lesson-2")));
    }

    #[test]
    fn set_current_overwrites() {
        let mut record = ProgressRecord::empty(fixed_now());
        record.set_current(LessonId::new("lesson-1"));
        record.set_current(LessonId::new("lesson-2"));
        assert_eq!(record.current_lesson(), Some(&LessonId::new("lesson-2")));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut record = ProgressRecord::empty(fixed_now());
        record.mark_complete(LessonId::new("lesson-1"));
        record.set_current(LessonId::new("lesson-2"));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"completedLessons\""));
        assert!(json.contains("\"currentLesson\""));
        assert!(json.contains("\"lastAccessed\""));
    }

    #[test]
    fn reads_the_historical_blob_shape() {
        let json = r#"{
            "completedLessons": ["lesson-1", "lesson-3"],
            "currentLesson": "lesson-3",
            "lastAccessed": "2023-11-14T22:13:20Z"
        }"#;
        let record: ProgressRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.completed_count(), 2);
        assert!(record.is_complete(&LessonId::new("lesson-3")));
        assert_eq!(record.current_lesson(), Some(&LessonId::new("lesson-3")));
    }

    #[test]
    fn round_trip_preserves_set_and_current() {
        let mut record = ProgressRecord::empty(fixed_now());
        record.mark_complete(LessonId::new("lesson-2"));
        record.set_current(LessonId::new("lesson-2"));

        let json = serde_json::to_string(&record).unwrap();
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.completed_lessons(), record.completed_lessons());
        assert_eq!(back.current_lesson(), record.current_lesson());
    }
}
