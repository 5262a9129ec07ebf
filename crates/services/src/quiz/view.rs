use serde::Serialize;

use course_core::model::{AnswerId, QuizVerdict};

use super::session::{GradedStatus, QuizResults};

/// Presentation-agnostic rendering of a graded quiz summary.
///
/// Carries the display strings the results panel shows; a frontend decides
/// the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResultsView {
    pub heading: String,
    pub score_line: String,
    pub message: String,
    pub score: u32,
    pub total: u32,
    pub questions: Vec<QuestionFeedbackView>,
}

/// Per-question feedback line plus the revealed correct option on a miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFeedbackView {
    pub index: usize,
    pub message: Option<String>,
    pub reveal_correct: Option<AnswerId>,
}

impl QuizResultsView {
    #[must_use]
    pub fn from_results(results: &QuizResults) -> Self {
        let summary = results.summary();
        let message = match summary.verdict() {
            QuizVerdict::Perfect => "Perfect score! Ready for the next lesson.",
            QuizVerdict::Review => "Review the material and try again.",
        };

        let questions = results
            .outcomes()
            .iter()
            .map(|outcome| match &outcome.status {
                GradedStatus::Correct => QuestionFeedbackView {
                    index: outcome.index,
                    message: Some("Correct! Well done.".to_owned()),
                    reveal_correct: None,
                },
                GradedStatus::Incorrect { correct_answer } => QuestionFeedbackView {
                    index: outcome.index,
                    message: Some("Not quite. Try reviewing the material above.".to_owned()),
                    reveal_correct: Some(correct_answer.clone()),
                },
                GradedStatus::Skipped => QuestionFeedbackView {
                    index: outcome.index,
                    message: None,
                    reveal_correct: None,
                },
            })
            .collect();

        Self {
            heading: "Quiz Complete!".to_owned(),
            score_line: format!("You scored {} out of {}", summary.score(), summary.total()),
            message: message.to_owned(),
            score: summary.score(),
            total: summary.total(),
            questions,
        }
    }
}
