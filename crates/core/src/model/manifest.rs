use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{ExerciseId, LessonId, ModuleId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ManifestError {
    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(LessonId),

    #[error("duplicate exercise id: {0}")]
    DuplicateExercise(ExerciseId),
}

//
// ─── ENTRIES ───────────────────────────────────────────────────────────────────
//

/// A single lesson as declared by the course manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonEntry {
    id: LessonId,
    title: String,
}

impl LessonEntry {
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// A named grouping of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    id: ModuleId,
    title: String,
    lessons: Vec<LessonEntry>,
}

impl ModuleEntry {
    /// A module with no lessons is allowed; its progress is defined as zero.
    #[must_use]
    pub fn new(id: ModuleId, title: impl Into<String>, lessons: Vec<LessonEntry>) -> Self {
        Self {
            id,
            title: title.into(),
            lessons,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn lessons(&self) -> &[LessonEntry] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

/// A coding exercise with optional hint and solution panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    id: ExerciseId,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    solution: Option<String>,
}

impl ExerciseDefinition {
    #[must_use]
    pub fn new(id: ExerciseId, hint: Option<String>, solution: Option<String>) -> Self {
        Self { id, hint, solution }
    }

    #[must_use]
    pub fn id(&self) -> &ExerciseId {
        &self.id
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }
}

//
// ─── MANIFEST ──────────────────────────────────────────────────────────────────
//

/// Explicit description of the course content a page presents.
///
/// The manifest is supplied at construction time and replaces any notion of
/// scanning presentation structure for lessons. Progress math is defined
/// entirely against this model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ManifestDraft")]
pub struct CourseManifest {
    modules: Vec<ModuleEntry>,
    #[serde(default)]
    exercises: Vec<ExerciseDefinition>,
}

/// Raw deserialized shape, validated before becoming a `CourseManifest`.
#[derive(Debug, Deserialize)]
struct ManifestDraft {
    modules: Vec<ModuleEntry>,
    #[serde(default)]
    exercises: Vec<ExerciseDefinition>,
}

impl TryFrom<ManifestDraft> for CourseManifest {
    type Error = ManifestError;

    fn try_from(draft: ManifestDraft) -> Result<Self, Self::Error> {
        Self::new(draft.modules, draft.exercises)
    }
}

impl CourseManifest {
    /// Builds a manifest, rejecting duplicate module, lesson, or exercise ids.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` naming the first duplicate id encountered.
    pub fn new(
        modules: Vec<ModuleEntry>,
        exercises: Vec<ExerciseDefinition>,
    ) -> Result<Self, ManifestError> {
        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        for module in &modules {
            if !module_ids.insert(module.id().clone()) {
                return Err(ManifestError::DuplicateModule(module.id().clone()));
            }
            for lesson in module.lessons() {
                if !lesson_ids.insert(lesson.id().clone()) {
                    return Err(ManifestError::DuplicateLesson(lesson.id().clone()));
                }
            }
        }

        let mut exercise_ids = HashSet::new();
        for exercise in &exercises {
            if !exercise_ids.insert(exercise.id().clone()) {
                return Err(ManifestError::DuplicateExercise(exercise.id().clone()));
            }
        }

        Ok(Self { modules, exercises })
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&ModuleEntry> {
        self.modules.iter().find(|m| m.id() == id)
    }

    /// The module expanded by default when a page initializes.
    #[must_use]
    pub fn first_module(&self) -> Option<&ModuleEntry> {
        self.modules.first()
    }

    /// Total lesson count across all modules.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(ModuleEntry::lesson_count).sum()
    }

    #[must_use]
    pub fn contains_lesson(&self, id: &LessonId) -> bool {
        self.lessons().any(|lesson| lesson.id() == id)
    }

    /// Iterates over every lesson in manifest order.
    pub fn lessons(&self) -> impl Iterator<Item = &LessonEntry> {
        self.modules.iter().flat_map(|m| m.lessons().iter())
    }

    #[must_use]
    pub fn exercises(&self) -> &[ExerciseDefinition] {
        &self.exercises
    }

    #[must_use]
    pub fn exercise(&self, id: &ExerciseId) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|e| e.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
