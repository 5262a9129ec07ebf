mod ids;
mod manifest;
mod progress;
mod quiz;

pub use ids::{AnswerId, ExerciseId, LessonId, ModuleId};
pub use manifest::{
    CourseManifest, ExerciseDefinition, LessonEntry, ManifestError, ModuleEntry,
};
pub use progress::ProgressRecord;
pub use quiz::{
    QuizDefinition, QuizDefinitionError, QuizOption, QuizQuestion, QuizSummary, QuizSummaryError,
    QuizVerdict,
};
