use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use course_core::model::{CourseManifest, ExerciseId};

use crate::error::EvaluationError;

/// Pluggable code evaluation.
///
/// The runner's whole contract with it is "call with the editor's text,
/// catch any failure"; swapping implementations never touches the runner's
/// control flow.
pub trait ExerciseEvaluator: Send + Sync {
    /// Evaluates submitted code, returning pass/fail.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError` when the code cannot be evaluated at all;
    /// the runner renders the message inline.
    fn evaluate(&self, code: &str) -> Result<bool, EvaluationError>;
}

/// Placeholder evaluator: accepts everything.
///
/// Stands in until a real test runner is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderEvaluator;

impl ExerciseEvaluator for PlaceholderEvaluator {
    fn evaluate(&self, _code: &str) -> Result<bool, EvaluationError> {
        Ok(true)
    }
}

/// What a single run renders into the output area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExerciseOutcome {
    Passed,
    Failed { message: String },
}

impl ExerciseOutcome {
    /// Display line for the output area.
    #[must_use]
    pub fn output_line(&self) -> String {
        match self {
            Self::Passed => "✓ Test passed! Great job!".to_owned(),
            Self::Failed { message } => format!("✗ Error: {message}"),
        }
    }
}

/// Visibility of an exercise's hint and solution panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PanelState {
    pub hint_visible: bool,
    pub solution_visible: bool,
}

/// Runs exercises against the injected evaluator and tracks panel
/// visibility.
///
/// Runs themselves are stateless: each invocation resolves the exercise by
/// id against the manifest at call time and keeps nothing afterwards.
pub struct ExerciseRunner {
    manifest: Arc<CourseManifest>,
    evaluator: Arc<dyn ExerciseEvaluator>,
    panels: HashMap<ExerciseId, PanelState>,
}

impl ExerciseRunner {
    #[must_use]
    pub fn new(manifest: Arc<CourseManifest>, evaluator: Arc<dyn ExerciseEvaluator>) -> Self {
        Self {
            manifest,
            evaluator,
            panels: HashMap::new(),
        }
    }

    /// Evaluates the editor text for one exercise.
    ///
    /// An unknown id is a silent no-op (`None`). An evaluator failure is
    /// caught here and rendered as the failure message — the one place an
    /// error is allowed to reach the user — and never propagates further.
    #[must_use]
    pub fn run(&self, exercise: &ExerciseId, code: &str) -> Option<ExerciseOutcome> {
        self.manifest.exercise(exercise)?;

        let outcome = match self.evaluator.evaluate(code) {
            Ok(true) => ExerciseOutcome::Passed,
            Ok(false) => ExerciseOutcome::Failed {
                message: "tests did not pass".to_owned(),
            },
            Err(err) => ExerciseOutcome::Failed {
                message: err.to_string(),
            },
        };
        Some(outcome)
    }

    /// Flips the hint panel. Independent of the solution panel and of `run`;
    /// unknown ids are ignored. Returns the new visibility.
    pub fn toggle_hint(&mut self, exercise: &ExerciseId) -> Option<bool> {
        self.manifest.exercise(exercise)?;
        let panel = self.panels.entry(exercise.clone()).or_default();
        panel.hint_visible = !panel.hint_visible;
        Some(panel.hint_visible)
    }

    /// Flips the solution panel; same contract as [`Self::toggle_hint`].
    pub fn toggle_solution(&mut self, exercise: &ExerciseId) -> Option<bool> {
        self.manifest.exercise(exercise)?;
        let panel = self.panels.entry(exercise.clone()).or_default();
        panel.solution_visible = !panel.solution_visible;
        Some(panel.solution_visible)
    }

    /// Current panel visibility; both panels start hidden.
    #[must_use]
    pub fn panel(&self, exercise: &ExerciseId) -> PanelState {
        self.panels.get(exercise).copied().unwrap_or_default()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::ExerciseDefinition;

    struct RejectingEvaluator;

    impl ExerciseEvaluator for RejectingEvaluator {
        fn evaluate(&self, _code: &str) -> Result<bool, EvaluationError> {
            Err(EvaluationError::new("unexpected token at line 3"))
        }
    }

    struct FailingEvaluator;

    impl ExerciseEvaluator for FailingEvaluator {
        fn evaluate(&self, _code: &str) -> Result<bool, EvaluationError> {
            Ok(false)
        }
    }

    fn manifest() -> Arc<CourseManifest> {
        Arc::new(
            CourseManifest::new(
                Vec::new(),
                vec![ExerciseDefinition::new(
                    ExerciseId::new("ex-1"),
                    Some("Think about the return value.".into()),
                    Some("return 42;".into()),
                )],
            )
            .unwrap(),
        )
    }

    #[test]
    fn passing_evaluation_renders_success() {
        let runner = ExerciseRunner::new(manifest(), Arc::new(PlaceholderEvaluator));
        let outcome = runner.run(&ExerciseId::new("ex-1"), "whatever").unwrap();
        assert_eq!(outcome, ExerciseOutcome::Passed);
        assert_eq!(outcome.output_line(), "✓ Test passed! Great job!");
    }

    #[test]
    fn evaluator_failure_is_rendered_not_propagated() {
        let runner = ExerciseRunner::new(manifest(), Arc::new(RejectingEvaluator));
        let outcome = runner.run(&ExerciseId::new("ex-1"), "nope").unwrap();
        assert_eq!(
            outcome.output_line(),
            "✗ Error: unexpected token at line 3"
        );
    }

    #[test]
    fn failed_tests_render_a_failure() {
        let runner = ExerciseRunner::new(manifest(), Arc::new(FailingEvaluator));
        let outcome = runner.run(&ExerciseId::new("ex-1"), "nope").unwrap();
        assert!(matches!(outcome, ExerciseOutcome::Failed { .. }));
    }

    #[test]
    fn unknown_exercise_is_a_silent_noop() {
        let mut runner = ExerciseRunner::new(manifest(), Arc::new(PlaceholderEvaluator));
        assert_eq!(runner.run(&ExerciseId::new("ex-9"), "code"), None);
        assert_eq!(runner.toggle_hint(&ExerciseId::new("ex-9")), None);
    }

    #[test]
    fn panels_toggle_independently() {
        let mut runner = ExerciseRunner::new(manifest(), Arc::new(PlaceholderEvaluator));
        let id = ExerciseId::new("ex-1");

        assert_eq!(runner.toggle_hint(&id), Some(true));
        assert_eq!(runner.toggle_hint(&id), Some(false));
        assert_eq!(runner.toggle_solution(&id), Some(true));

        let panel = runner.panel(&id);
        assert!(!panel.hint_visible);
        assert!(panel.solution_visible);
    }

    #[test]
    fn running_does_not_disturb_panels() {
        let mut runner = ExerciseRunner::new(manifest(), Arc::new(PlaceholderEvaluator));
        let id = ExerciseId::new("ex-1");
        runner.toggle_hint(&id);
        runner.run(&id, "code");
        assert!(runner.panel(&id).hint_visible);
    }
}
