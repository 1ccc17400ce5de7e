//! In-memory bundle of everything the analytics read.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use study_core::model::{Chapter, MockExam, RecallRecord, StudyGoals, StudyLog};

use crate::error::SnapshotError;

/// Chapters, logs, goals, recall checks and mock exams as supplied by the
/// caller. Every entity is validated on deserialization; `validate` adds the
/// cross-entity checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub study_logs: Vec<StudyLog>,
    #[serde(default)]
    pub goals: StudyGoals,
    #[serde(default)]
    pub recall_records: Vec<RecallRecord>,
    #[serde(default)]
    pub mock_exams: Vec<MockExam>,
}

impl StudySnapshot {
    /// Parse and validate a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` on malformed input or invalid entities,
    /// otherwise any error from [`StudySnapshot::validate`].
    pub fn from_json(input: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(input)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check references between entities.
    ///
    /// # Errors
    ///
    /// Returns the first duplicate id or dangling chapter reference found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut chapters = HashSet::with_capacity(self.chapters.len());
        for chapter in &self.chapters {
            if !chapters.insert(chapter.id()) {
                return Err(SnapshotError::DuplicateChapter(chapter.id().clone()));
            }
        }

        let mut log_ids = HashSet::with_capacity(self.study_logs.len());
        for log in &self.study_logs {
            if !log_ids.insert(log.id()) {
                return Err(SnapshotError::DuplicateStudyLog(log.id()));
            }
            if !chapters.contains(log.chapter_id()) {
                return Err(SnapshotError::UnknownLogChapter {
                    log: log.id(),
                    chapter: log.chapter_id().clone(),
                });
            }
        }

        if let Some(record) = self
            .recall_records
            .iter()
            .find(|r| !chapters.contains(r.chapter_id()))
        {
            return Err(SnapshotError::UnknownRecallChapter(record.chapter_id().clone()));
        }

        let mut exam_ids = HashSet::with_capacity(self.mock_exams.len());
        for exam in &self.mock_exams {
            if !exam_ids.insert(exam.id()) {
                return Err(SnapshotError::DuplicateMockExam(exam.id()));
            }
        }

        tracing::debug!(
            chapters = self.chapters.len(),
            logs = self.study_logs.len(),
            recalls = self.recall_records.len(),
            mock_exams = self.mock_exams.len(),
            "snapshot validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{ChapterId, Section};

    const SNAPSHOT: &str = r#"{
        "chapters": [
            { "id": "FAR-1", "section": "FAR", "number": 1, "title": "Conceptual framework" },
            { "id": "FAR-2", "section": "FAR", "number": 2, "title": "Revenue" }
        ],
        "studyLogs": [
            { "id": 1, "date": "2023-11-10", "chapterId": "FAR-1", "studyHours": 2.0,
              "mcQuestions": 20, "mcCorrect": 15 }
        ],
        "goals": { "sections": { "FAR": { "examDate": "2024-01-15" } } },
        "recallRecords": [
            { "chapterId": "FAR-1", "recordedOn": "2023-11-12", "rating": 3, "predictedRetention": 60 }
        ],
        "mockExams": [
            { "id": 1, "date": "2023-11-11", "section": "FAR", "source": "Practice A",
              "mcQuestions": 40, "mcCorrect": 30 }
        ]
    }"#;

    #[test]
    fn parses_full_snapshot() {
        let snapshot = StudySnapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.chapters.len(), 2);
        assert_eq!(snapshot.study_logs[0].questions_answered(), 20);
        assert!(snapshot.goals.exam_date(Section::Far).is_some());
        assert!((snapshot.goals.daily_study_hours() - 3.0).abs() < 1e-9);
        assert_eq!(snapshot.recall_records.len(), 1);
        assert_eq!(snapshot.mock_exams[0].total_questions(), 40);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot = StudySnapshot::from_json("{}").unwrap();
        assert!(snapshot.chapters.is_empty());
        assert_eq!(snapshot.goals, StudyGoals::default());
    }

    #[test]
    fn invalid_entities_fail_to_parse() {
        let input = r#"{ "studyLogs": [
            { "id": 1, "date": "2023-11-10", "chapterId": "FAR-1", "studyHours": -1.0 }
        ] }"#;
        assert!(matches!(StudySnapshot::from_json(input), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn dangling_log_is_rejected() {
        let input = r#"{
            "chapters": [ { "id": "AUD-1", "section": "AUD", "number": 1, "title": "Ethics" } ],
            "studyLogs": [ { "id": 7, "date": "2023-11-10", "chapterId": "AUD-9", "studyHours": 1.0 } ]
        }"#;
        let err = StudySnapshot::from_json(input).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnknownLogChapter { ref chapter, .. } if *chapter == ChapterId::new("AUD-9")
        ));
    }

    #[test]
    fn duplicate_chapter_is_rejected() {
        let input = r#"{ "chapters": [
            { "id": "REG-1", "section": "REG", "number": 1, "title": "Ethics" },
            { "id": "REG-1", "section": "REG", "number": 2, "title": "Tax" }
        ] }"#;
        assert!(matches!(
            StudySnapshot::from_json(input),
            Err(SnapshotError::DuplicateChapter(_))
        ));
    }

    #[test]
    fn dangling_recall_is_rejected() {
        let input = r#"{
            "recallRecords": [
                { "chapterId": "BAR-1", "recordedOn": "2023-11-12", "rating": 2, "predictedRetention": 50 }
            ]
        }"#;
        assert!(matches!(
            StudySnapshot::from_json(input),
            Err(SnapshotError::UnknownRecallChapter(_))
        ));
    }
}
