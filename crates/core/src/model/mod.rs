mod chapter;
mod goals;
mod ids;
mod mock_exam;
mod recall;
mod study_log;

pub use ids::{ChapterId, MockExamId, ParseIdError, StudyLogId};

pub use chapter::{Chapter, ChapterDraft, ChapterError, Section};
pub use goals::{GoalsError, SectionGoal, StudyGoals, StudyGoalsDraft};
pub use mock_exam::{MockExam, MockExamDraft, MockExamError};
pub use recall::{RecallError, RecallRating, RecallRecord, RecallRecordDraft};
pub use study_log::{StudyLog, StudyLogDraft, StudyLogError};
