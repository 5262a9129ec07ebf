use thiserror::Error;

use crate::model::{ManifestError, QuizDefinitionError, QuizSummaryError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    QuizDefinition(#[from] QuizDefinitionError),
    #[error(transparent)]
    QuizSummary(#[from] QuizSummaryError),
}
