#![forbid(unsafe_code)]

pub mod app_services;
pub mod code_block_service;
pub mod error;
pub mod exercise_service;
pub mod progress_service;
pub mod progress_view;
pub mod quiz;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use code_block_service::{
    COPY_FEEDBACK_LABEL, Clipboard, CodeBlock, CodeBlockService, CopyButton, NoopClipboard,
};
pub use error::{AppServicesError, ClipboardError, EvaluationError};
pub use exercise_service::{
    ExerciseEvaluator, ExerciseOutcome, ExerciseRunner, PanelState, PlaceholderEvaluator,
};
pub use progress_service::ProgressService;
pub use progress_view::{LessonStatusView, ModuleProgressView, ProgressView};
pub use quiz::{
    GradedStatus, QuestionFeedbackView, QuestionOutcome, QuizProgress, QuizResults,
    QuizResultsView, QuizSession,
};
