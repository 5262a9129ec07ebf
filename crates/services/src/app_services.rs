use std::sync::Arc;

use course_core::model::{CourseManifest, QuizDefinition};
use storage::repository::Storage;

use crate::Clock;
use crate::code_block_service::{Clipboard, CodeBlockService};
use crate::error::AppServicesError;
use crate::exercise_service::{ExerciseEvaluator, ExerciseRunner};
use crate::progress_service::ProgressService;
use crate::quiz::QuizSession;

/// Assembles the page's components behind one explicit construction
/// boundary.
///
/// Nothing here is ambient: storage, clock, manifest, evaluator, and
/// clipboard are all injected once, and each component is handed out from
/// this object. Components never call each other.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    manifest: Arc<CourseManifest>,
    storage: Storage,
    evaluator: Arc<dyn ExerciseEvaluator>,
    clipboard: Arc<dyn Clipboard>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        manifest: CourseManifest,
        evaluator: Arc<dyn ExerciseEvaluator>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::assemble(clock, manifest, storage, evaluator, clipboard))
    }

    /// Build services on in-memory storage, for tests and prototyping.
    #[must_use]
    pub fn in_memory(
        clock: Clock,
        manifest: CourseManifest,
        evaluator: Arc<dyn ExerciseEvaluator>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self::assemble(clock, manifest, Storage::in_memory(), evaluator, clipboard)
    }

    fn assemble(
        clock: Clock,
        manifest: CourseManifest,
        storage: Storage,
        evaluator: Arc<dyn ExerciseEvaluator>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            clock,
            manifest: Arc::new(manifest),
            storage,
            evaluator,
            clipboard,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn manifest(&self) -> Arc<CourseManifest> {
        Arc::clone(&self.manifest)
    }

    /// Loads the progress store (fail-soft; see
    /// [`ProgressService::load`]).
    pub async fn progress(&self) -> ProgressService {
        ProgressService::load(
            self.clock,
            Arc::clone(&self.manifest),
            Arc::clone(&self.storage.progress),
        )
        .await
    }

    /// A fresh grading session for one quiz container.
    #[must_use]
    pub fn quiz(&self, definition: QuizDefinition) -> QuizSession {
        QuizSession::new(definition)
    }

    #[must_use]
    pub fn code_blocks(&self) -> CodeBlockService {
        CodeBlockService::new(self.clock, Arc::clone(&self.clipboard))
    }

    #[must_use]
    pub fn exercises(&self) -> ExerciseRunner {
        ExerciseRunner::new(Arc::clone(&self.manifest), Arc::clone(&self.evaluator))
    }
}
