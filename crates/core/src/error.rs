use thiserror::Error;

use crate::model::{ChapterError, GoalsError, MockExamError, RecallError, StudyLogError};

/// Any validation failure raised while building model values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Chapter(#[from] ChapterError),
    #[error(transparent)]
    StudyLog(#[from] StudyLogError),
    #[error(transparent)]
    Recall(#[from] RecallError),
    #[error(transparent)]
    Goals(#[from] GoalsError),
    #[error(transparent)]
    MockExam(#[from] MockExamError),
}
