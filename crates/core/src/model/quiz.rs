use thiserror::Error;

use crate::model::ids::AnswerId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDefinitionError {
    #[error("question has no options")]
    NoOptions,

    #[error("question must designate exactly one correct option, found {found}")]
    CorrectMarkerCount { found: usize },

    #[error("duplicate option id within a question: {0}")]
    DuplicateOption(AnswerId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSummaryError {
    #[error("score ({score}) exceeds question count ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

//
// ─── DEFINITION ────────────────────────────────────────────────────────────────
//

/// One selectable answer. The `correct` flag is the designated-correct marker
/// grading compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    id: AnswerId,
    text: String,
    correct: bool,
}

impl QuizOption {
    #[must_use]
    pub fn new(id: AnswerId, text: impl Into<String>, correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> &AnswerId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<QuizOption>,
}

impl QuizQuestion {
    /// Creates a question.
    ///
    /// # Errors
    ///
    /// Returns `QuizDefinitionError` if there are no options, the options do
    /// not designate exactly one correct answer, or option ids repeat.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<QuizOption>,
    ) -> Result<Self, QuizDefinitionError> {
        if options.is_empty() {
            return Err(QuizDefinitionError::NoOptions);
        }

        let correct = options.iter().filter(|o| o.is_correct()).count();
        if correct != 1 {
            return Err(QuizDefinitionError::CorrectMarkerCount { found: correct });
        }

        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|prior| prior.id() == option.id()) {
                return Err(QuizDefinitionError::DuplicateOption(option.id().clone()));
            }
        }

        Ok(Self {
            prompt: prompt.into(),
            options,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, id: &AnswerId) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id() == id)
    }

    /// The option carrying the designated-correct marker.
    ///
    /// Construction guarantees exactly one exists.
    #[must_use]
    pub fn correct_option(&self) -> &QuizOption {
        self.options
            .iter()
            .find(|o| o.is_correct())
            .expect("validated at construction: exactly one correct option")
    }
}

/// The full set of questions a quiz container presents.
///
/// A quiz with zero questions is valid and grades to 0 out of 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizDefinition {
    questions: Vec<QuizQuestion>,
}

impl QuizDefinition {
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Qualitative result of a graded quiz, gated on score equality with total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizVerdict {
    Perfect,
    Review,
}

/// Score over question count for a graded quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    score: u32,
    total: u32,
}

impl QuizSummary {
    /// Creates a summary.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError::ScoreExceedsTotal` if `score > total`.
    pub fn new(score: u32, total: u32) -> Result<Self, QuizSummaryError> {
        if score > total {
            return Err(QuizSummaryError::ScoreExceedsTotal { score, total });
        }
        Ok(Self { score, total })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// `Perfect` exactly when every question was answered correctly. An empty
    /// quiz (0 of 0) satisfies the equality and is Perfect.
    #[must_use]
    pub fn verdict(&self) -> QuizVerdict {
        if self.score == self.total {
            QuizVerdict::Perfect
        } else {
            QuizVerdict::Review
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, correct: bool) -> QuizOption {
        QuizOption::new(AnswerId::new(id), format!("Option {id}"), correct)
    }

    #[test]
    fn question_requires_exactly_one_correct_option() {
        let err = QuizQuestion::new("Q", vec![option("a", false), option("b", false)]).unwrap_err();
        assert_eq!(err, QuizDefinitionError::CorrectMarkerCount { found: 0 });

        let err = QuizQuestion::new("Q", vec![option("a", true), option("b", true)]).unwrap_err();
        assert_eq!(err, QuizDefinitionError::CorrectMarkerCount { found: 2 });
    }

    #[test]
    fn question_rejects_duplicate_option_ids() {
        let err = QuizQuestion::new("Q", vec![option("a", true), option("a", false)]).unwrap_err();
        assert!(matches!(err, QuizDefinitionError::DuplicateOption(_)));
    }

    #[test]
    fn correct_option_is_the_marked_one() {
        let question = QuizQuestion::new("Q", vec![option("a", false), option("b", true)]).unwrap();
        assert_eq!(question.correct_option().id(), &AnswerId::new("b"));
    }

    #[test]
    fn summary_rejects_score_over_total() {
        let err = QuizSummary::new(3, 2).unwrap_err();
        assert_eq!(err, QuizSummaryError::ScoreExceedsTotal { score: 3, total: 2 });
    }

    #[test]
    fn verdict_gates_on_equality() {
        assert_eq!(QuizSummary::new(2, 2).unwrap().verdict(), QuizVerdict::Perfect);
        assert_eq!(QuizSummary::new(1, 2).unwrap().verdict(), QuizVerdict::Review);
        assert_eq!(QuizSummary::new(0, 0).unwrap().verdict(), QuizVerdict::Perfect);
    }
}
