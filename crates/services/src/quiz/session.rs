use std::fmt;

use course_core::model::{AnswerId, QuizDefinition, QuizOption, QuizSummary};

/// Aggregated view of quiz answering progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub submitted: bool,
}

/// How a single question graded at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradedStatus {
    Correct,
    /// The wrong option was chosen; the designated-correct option is revealed.
    Incorrect { correct_answer: AnswerId },
    /// No option was selected, so grading skipped the question entirely.
    Skipped,
}

/// Per-question grading record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub index: usize,
    pub selected: Option<AnswerId>,
    pub status: GradedStatus,
}

/// The terminal result of a graded quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    outcomes: Vec<QuestionOutcome>,
    summary: QuizSummary,
}

impl QuizResults {
    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        self.summary
    }
}

/// Transient per-quiz grading state, never persisted.
///
/// Each quiz container gets its own session; it is discarded on navigation.
/// The lifecycle is Unanswered → Answered (per question) → Submitted, and
/// submission is terminal: once graded, every option is inert and there is
/// no reset.
pub struct QuizSession {
    definition: QuizDefinition,
    selections: Vec<Option<AnswerId>>,
    current_question: usize,
    results: Option<QuizResults>,
}

impl QuizSession {
    #[must_use]
    pub fn new(definition: QuizDefinition) -> Self {
        let selections = vec![None; definition.question_count()];
        Self {
            definition,
            selections,
            current_question: 0,
            results: None,
        }
    }

    #[must_use]
    pub fn definition(&self) -> &QuizDefinition {
        &self.definition
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.results.is_some()
    }

    /// The recorded selection for a question, if any.
    #[must_use]
    pub fn selection(&self, question: usize) -> Option<&AnswerId> {
        self.selections.get(question).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn current_question(&self) -> usize {
        self.current_question
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.definition.question_count(),
            answered: self.selections.iter().flatten().count(),
            submitted: self.is_submitted(),
        }
    }

    /// Records a selection for a question, replacing any prior choice.
    ///
    /// Exactly one option is selected per question at a time. Returns `false`
    /// without recording anything when the session is already submitted
    /// (options are inert), the index names no question, or the id names no
    /// option of that question.
    pub fn select_answer(&mut self, question: usize, answer: AnswerId) -> bool {
        if self.is_submitted() {
            return false;
        }
        let Some(entry) = self.definition.question(question) else {
            return false;
        };
        if entry.option(&answer).is_none() {
            return false;
        }
        self.selections[question] = Some(answer);
        true
    }

    /// Grades every question once and renders the summary.
    ///
    /// Unanswered questions are skipped with no grading side effect; a
    /// correct selection scores exactly one point; a wrong selection reveals
    /// the correct option. Grading is terminal: a repeat call returns the
    /// stored results unchanged, so a double submit can never double-count.
    /// Zero questions grade to 0 out of 0 without error.
    pub fn submit(&mut self) -> &QuizResults {
        if self.results.is_none() {
            let graded = self.grade();
            self.results = Some(graded);
        }
        self.results
            .as_ref()
            .expect("grading is terminal and just ran")
    }

    /// `Some` only after submission.
    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    /// Forward-only index increment for a paginated multi-question flow.
    ///
    /// This surface does not paginate; the contract is only "advances by
    /// exactly one". Anyone adding pagination must bound the index against
    /// the question count.
    pub fn next_question(&mut self) {
        self.current_question = self.current_question.saturating_add(1);
    }

    fn grade(&self) -> QuizResults {
        let mut score: u32 = 0;
        let mut outcomes = Vec::with_capacity(self.definition.question_count());

        for (index, question) in self.definition.questions().iter().enumerate() {
            let selected = self.selections[index].clone();
            let status = match &selected {
                None => GradedStatus::Skipped,
                Some(answer) => {
                    if question.option(answer).is_some_and(QuizOption::is_correct) {
                        score += 1;
                        GradedStatus::Correct
                    } else {
                        GradedStatus::Incorrect {
                            correct_answer: question.correct_option().id().clone(),
                        }
                    }
                }
            };
            outcomes.push(QuestionOutcome {
                index,
                selected,
                status,
            });
        }

        let total = u32::try_from(self.definition.question_count()).unwrap_or(u32::MAX);
        let summary = QuizSummary::new(score.min(total), total)
            .expect("score is bounded by the question count");

        QuizResults { outcomes, summary }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions", &self.definition.question_count())
            .field("answered", &self.selections.iter().flatten().count())
            .field("current_question", &self.current_question)
            .field("submitted", &self.is_submitted())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{QuizQuestion, QuizVerdict};

    fn question(correct: &str, wrong: &str) -> QuizQuestion {
        QuizQuestion::new(
            "Q",
            vec![
                QuizOption::new(AnswerId::new(correct), "right", true),
                QuizOption::new(AnswerId::new(wrong), "wrong", false),
            ],
        )
        .unwrap()
    }

    fn three_question_quiz() -> QuizDefinition {
        QuizDefinition::new(vec![
            question("a", "b"),
            question("c", "d"),
            question("e", "f"),
        ])
    }

    #[test]
    fn scores_exactly_the_correct_selections() {
        let mut session = QuizSession::new(three_question_quiz());
        assert!(session.select_answer(0, AnswerId::new("a")));
        assert!(session.select_answer(1, AnswerId::new("d")));
        assert!(session.select_answer(2, AnswerId::new("e")));

        let results = session.submit();
        assert_eq!(results.summary().score(), 2);
        assert_eq!(results.summary().total(), 3);
        assert_eq!(results.summary().verdict(), QuizVerdict::Review);
    }

    #[test]
    fn perfect_when_every_answer_is_correct() {
        let mut session = QuizSession::new(three_question_quiz());
        session.select_answer(0, AnswerId::new("a"));
        session.select_answer(1, AnswerId::new("c"));
        session.select_answer(2, AnswerId::new("e"));

        let results = session.submit();
        assert_eq!(results.summary().score(), 3);
        assert_eq!(results.summary().verdict(), QuizVerdict::Perfect);
    }

    #[test]
    fn selection_replaces_prior_choice() {
        let mut session = QuizSession::new(three_question_quiz());
        session.select_answer(0, AnswerId::new("b"));
        session.select_answer(0, AnswerId::new("a"));
        assert_eq!(session.selection(0), Some(&AnswerId::new("a")));

        let results = session.submit();
        assert_eq!(results.summary().score(), 1);
    }

    #[test]
    fn unanswered_questions_are_skipped() {
        let mut session = QuizSession::new(three_question_quiz());
        session.select_answer(1, AnswerId::new("c"));

        let results = session.submit();
        assert_eq!(results.summary().score(), 1);
        assert_eq!(results.outcomes()[0].status, GradedStatus::Skipped);
        assert_eq!(results.outcomes()[2].status, GradedStatus::Skipped);
    }

    #[test]
    fn wrong_answers_reveal_the_correct_option() {
        let mut session = QuizSession::new(three_question_quiz());
        session.select_answer(0, AnswerId::new("b"));

        let results = session.submit();
        assert_eq!(
            results.outcomes()[0].status,
            GradedStatus::Incorrect {
                correct_answer: AnswerId::new("a")
            }
        );
    }

    #[test]
    fn double_submit_never_double_counts() {
        let mut session = QuizSession::new(three_question_quiz());
        session.select_answer(0, AnswerId::new("a"));

        let first = session.submit().summary();
        let second = session.submit().summary();
        assert_eq!(first.score(), 1);
        assert_eq!(second.score(), 1);
    }

    #[test]
    fn options_are_inert_after_submit() {
        let mut session = QuizSession::new(three_question_quiz());
        session.select_answer(0, AnswerId::new("b"));
        session.submit();

        assert!(!session.select_answer(0, AnswerId::new("a")));
        assert_eq!(session.submit().summary().score(), 0);
    }

    #[test]
    fn empty_quiz_grades_to_zero_of_zero() {
        let mut session = QuizSession::new(QuizDefinition::default());
        let results = session.submit();
        assert_eq!(results.summary().score(), 0);
        assert_eq!(results.summary().total(), 0);
        assert!(results.outcomes().is_empty());
    }

    #[test]
    fn selections_outside_the_quiz_are_rejected() {
        let mut session = QuizSession::new(three_question_quiz());
        assert!(!session.select_answer(7, AnswerId::new("a")));
        assert!(!session.select_answer(0, AnswerId::new("zz")));
        assert_eq!(session.progress().answered, 0);
    }

    #[test]
    fn next_question_advances_by_exactly_one() {
        let mut session = QuizSession::new(three_question_quiz());
        assert_eq!(session.current_question(), 0);
        session.next_question();
        assert_eq!(session.current_question(), 1);
    }
}
