#![forbid(unsafe_code)]

pub mod analytics;
pub mod error;
pub mod index;
pub mod mock_exams;
pub mod progress;
pub mod report;
pub mod snapshot;

pub use study_core::Clock;

pub use error::SnapshotError;
pub use index::{ChapterLogs, LogIndex};
pub use mock_exams::{MockExamSummary, summarize_mock_exams};
pub use progress::{ReviewQueue, SectionProgress, build_review_queue, summarize_sections};
pub use report::{AnalyticsReport, AnalyticsService};
pub use snapshot::StudySnapshot;
