//! Shared error types for the services crate.

use thiserror::Error;

use study_core::model::{ChapterId, MockExamId, StudyLogId};

/// Errors emitted while loading or checking a `StudySnapshot`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("chapter {0} appears more than once in the catalog")]
    DuplicateChapter(ChapterId),
    #[error("study log {log} refers to unknown chapter {chapter}")]
    UnknownLogChapter { log: StudyLogId, chapter: ChapterId },
    #[error("recall record refers to unknown chapter {0}")]
    UnknownRecallChapter(ChapterId),
    #[error("mock exam id {0} is used more than once")]
    DuplicateMockExam(MockExamId),
    #[error("study log id {0} is used more than once")]
    DuplicateStudyLog(StudyLogId),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
