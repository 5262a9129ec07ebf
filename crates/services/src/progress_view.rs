use serde::Serialize;

use course_core::model::{LessonId, ModuleId};

/// Presentation-agnostic snapshot of course progress.
///
/// This is intentionally **not** a UI view-model:
/// - no markup, no colors
/// - no localization assumptions
///
/// A frontend draws the bar, the circular indicators, and the per-lesson
/// checkmarks from these numbers however it likes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub overall_percent: f64,
    /// Rounded display label, e.g. `42%`.
    pub overall_label: String,
    pub modules: Vec<ModuleProgressView>,
}

/// One module's slice of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleProgressView {
    pub id: ModuleId,
    pub title: String,
    pub percent: f64,
    /// Proportional arc for a circular indicator, 0–360 degrees.
    pub arc_degrees: f64,
    pub label: String,
    pub expanded: bool,
    pub lessons: Vec<LessonStatusView>,
}

/// Completion/bookmark flags for a single visible lesson.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonStatusView {
    pub id: LessonId,
    pub title: String,
    pub completed: bool,
    pub current: bool,
}

/// Rounded percentage label shared by the overall bar and module circles.
#[must_use]
pub fn percent_label(percent: f64) -> String {
    format!("{}%", percent.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_rounds_to_nearest_whole_percent() {
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(33.333), "33%");
        assert_eq!(percent_label(66.666), "67%");
        assert_eq!(percent_label(100.0), "100%");
    }
}
