mod session;
mod view;

pub use session::{GradedStatus, QuestionOutcome, QuizProgress, QuizResults, QuizSession};
pub use view::{QuestionFeedbackView, QuizResultsView};
