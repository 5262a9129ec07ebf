use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use course_core::model::{CourseManifest, LessonId, ModuleId, ProgressRecord};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::progress_view::{
    LessonStatusView, ModuleProgressView, ProgressView, percent_label,
};

/// The progress store: sole owner and writer of the persisted progress
/// record, and the source of every completion percentage the page shows.
///
/// Progress math is defined against the injected [`CourseManifest`], never
/// against presentation structure. Persistence failures are logged to the
/// diagnostic channel and swallowed; no operation here raises past the
/// component boundary.
pub struct ProgressService {
    clock: Clock,
    manifest: Arc<CourseManifest>,
    repo: Arc<dyn ProgressRepository>,
    record: ProgressRecord,
    expanded: HashSet<ModuleId>,
}

impl ProgressService {
    /// Reads the persisted record and builds the store.
    ///
    /// Fails soft: a missing or unparseable record yields the default empty
    /// record, and the failure is only logged. The first manifest module
    /// starts expanded; all others collapsed.
    pub async fn load(
        clock: Clock,
        manifest: Arc<CourseManifest>,
        repo: Arc<dyn ProgressRepository>,
    ) -> Self {
        let record = match repo.load_progress().await {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::empty(clock.now()),
            Err(err) => {
                tracing::warn!(error = %err, "stored progress unreadable, starting fresh");
                ProgressRecord::empty(clock.now())
            }
        };

        let expanded = manifest
            .first_module()
            .map(|module| module.id().clone())
            .into_iter()
            .collect();

        Self {
            clock,
            manifest,
            repo,
            record,
            expanded,
        }
    }

    #[must_use]
    pub fn manifest(&self) -> &CourseManifest {
        &self.manifest
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    /// Adds the lesson to the completed set and persists.
    ///
    /// Idempotent: a second call with the same id changes nothing and skips
    /// the write. Returns whether the set changed.
    pub async fn mark_complete(&mut self, lesson: LessonId) -> bool {
        if !self.record.mark_complete(lesson) {
            return false;
        }
        self.persist().await;
        true
    }

    /// Unconditionally overwrites the current-lesson bookmark and persists.
    pub async fn set_current(&mut self, lesson: LessonId) {
        self.record.set_current(lesson);
        self.persist().await;
    }

    /// The lesson-click wiring: bookmarks the lesson as current.
    ///
    /// Deliberately does NOT mark it complete; completion is triggered
    /// externally (by lesson-page content), not by navigation.
    pub async fn select_lesson(&mut self, lesson: LessonId) {
        self.set_current(lesson).await;
    }

    /// Pure membership check, no side effects.
    #[must_use]
    pub fn is_complete(&self, lesson: &LessonId) -> bool {
        self.record.is_complete(lesson)
    }

    /// Completion percentage in `[0, 100]` for one module's lessons.
    ///
    /// An unknown module or a module with zero lessons is 0.0; there is no
    /// division by the empty count.
    #[must_use]
    pub fn module_progress(&self, module: &ModuleId) -> f64 {
        let Some(module) = self.manifest.module(module) else {
            return 0.0;
        };
        let completed = module
            .lessons()
            .iter()
            .filter(|lesson| self.record.is_complete(lesson.id()))
            .count();
        percentage(completed, module.lesson_count())
    }

    /// Completion percentage in `[0, 100]` across the whole manifest.
    ///
    /// The numerator is the persisted completed count, the denominator the
    /// manifest's total lesson count; an empty manifest is 0.0.
    #[must_use]
    pub fn overall_progress(&self) -> f64 {
        percentage(self.record.completed_count(), self.manifest.total_lessons())
    }

    /// Flips a module between expanded and collapsed. Unknown module ids are
    /// a silent no-op.
    pub fn toggle_module(&mut self, module: &ModuleId) {
        if self.manifest.module(module).is_none() {
            return;
        }
        if !self.expanded.remove(module) {
            self.expanded.insert(module.clone());
        }
    }

    #[must_use]
    pub fn is_expanded(&self, module: &ModuleId) -> bool {
        self.expanded.contains(module)
    }

    /// Idempotent snapshot of everything the page reflects: overall bar,
    /// per-module arcs, per-lesson completed/current marks.
    ///
    /// Derived fresh on every call; repeated calls accumulate no state.
    #[must_use]
    pub fn view(&self) -> ProgressView {
        let modules = self
            .manifest
            .modules()
            .iter()
            .map(|module| {
                let percent = self.module_progress(module.id());
                let lessons = module
                    .lessons()
                    .iter()
                    .map(|lesson| LessonStatusView {
                        id: lesson.id().clone(),
                        title: lesson.title().to_owned(),
                        completed: self.record.is_complete(lesson.id()),
                        current: self.record.current_lesson() == Some(lesson.id()),
                    })
                    .collect();
                ModuleProgressView {
                    id: module.id().clone(),
                    title: module.title().to_owned(),
                    percent,
                    arc_degrees: percent * 3.6,
                    label: percent_label(percent),
                    expanded: self.is_expanded(module.id()),
                    lessons,
                }
            })
            .collect();

        let overall = self.overall_progress();
        ProgressView {
            overall_percent: overall,
            overall_label: percent_label(overall),
            modules,
        }
    }

    async fn persist(&mut self) {
        self.record.touch(self.clock.now());
        if let Err(err) = self.repo.save_progress(&self.record).await {
            tracing::warn!(error = %err, "failed to persist progress");
        }
    }
}

impl fmt::Debug for ProgressService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressService")
            .field("completed", &self.record.completed_count())
            .field("current", &self.record.current_lesson())
            .field("expanded", &self.expanded)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (completed as f64 / total as f64) * 100.0
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
