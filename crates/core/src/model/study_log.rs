use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChapterId, StudyLogId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StudyLogError {
    #[error("study hours must be finite and non-negative, got {provided}")]
    InvalidHours { provided: f64 },

    #[error("{kind} correct answers ({correct}) exceed questions ({questions})")]
    CorrectExceedsQuestions {
        kind: &'static str,
        correct: u32,
        questions: u32,
    },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated study session as entered in the log form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLogDraft {
    pub id: StudyLogId,
    pub date: NaiveDate,
    pub chapter_id: ChapterId,
    pub study_hours: f64,
    #[serde(default)]
    pub mc_questions: u32,
    #[serde(default)]
    pub mc_correct: u32,
    #[serde(default)]
    pub tbs_questions: u32,
    #[serde(default)]
    pub tbs_correct: u32,
    #[serde(default)]
    pub memo: String,
}

impl StudyLogDraft {
    /// Draft with no questions and an empty memo.
    #[must_use]
    pub fn new(id: StudyLogId, date: NaiveDate, chapter_id: ChapterId, study_hours: f64) -> Self {
        Self {
            id,
            date,
            chapter_id,
            study_hours,
            mc_questions: 0,
            mc_correct: 0,
            tbs_questions: 0,
            tbs_correct: 0,
            memo: String::new(),
        }
    }

    #[must_use]
    pub fn with_mc(mut self, questions: u32, correct: u32) -> Self {
        self.mc_questions = questions;
        self.mc_correct = correct;
        self
    }

    #[must_use]
    pub fn with_tbs(mut self, questions: u32, correct: u32) -> Self {
        self.tbs_questions = questions;
        self.tbs_correct = correct;
        self
    }

    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Validate the draft into an immutable log entry.
    ///
    /// # Errors
    ///
    /// Returns `StudyLogError::InvalidHours` for negative or non-finite hours and
    /// `StudyLogError::CorrectExceedsQuestions` when a correct count is larger than
    /// its question count.
    pub fn validate(self) -> Result<StudyLog, StudyLogError> {
        if !self.study_hours.is_finite() || self.study_hours < 0.0 {
            return Err(StudyLogError::InvalidHours {
                provided: self.study_hours,
            });
        }
        check_counts("MC", self.mc_questions, self.mc_correct)?;
        check_counts("TBS", self.tbs_questions, self.tbs_correct)?;

        Ok(StudyLog {
            id: self.id,
            date: self.date,
            chapter_id: self.chapter_id,
            study_hours: self.study_hours,
            mc_questions: self.mc_questions,
            mc_correct: self.mc_correct,
            tbs_questions: self.tbs_questions,
            tbs_correct: self.tbs_correct,
            memo: self.memo.trim().to_string(),
        })
    }
}

fn check_counts(kind: &'static str, questions: u32, correct: u32) -> Result<(), StudyLogError> {
    if correct > questions {
        return Err(StudyLogError::CorrectExceedsQuestions {
            kind,
            correct,
            questions,
        });
    }
    Ok(())
}

//
// ─── STUDY LOG ─────────────────────────────────────────────────────────────────
//

/// One study session on one chapter.
///
/// Only the chapter id is stored; section and title come from the catalog.
/// Several logs may share a day and chapter, and all of them count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StudyLogDraft")]
pub struct StudyLog {
    id: StudyLogId,
    date: NaiveDate,
    chapter_id: ChapterId,
    study_hours: f64,
    mc_questions: u32,
    mc_correct: u32,
    tbs_questions: u32,
    tbs_correct: u32,
    memo: String,
}

impl TryFrom<StudyLogDraft> for StudyLog {
    type Error = StudyLogError;

    fn try_from(draft: StudyLogDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl StudyLog {
    #[must_use]
    pub fn id(&self) -> StudyLogId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn chapter_id(&self) -> &ChapterId {
        &self.chapter_id
    }

    #[must_use]
    pub fn study_hours(&self) -> f64 {
        self.study_hours
    }

    #[must_use]
    pub fn mc_questions(&self) -> u32 {
        self.mc_questions
    }

    #[must_use]
    pub fn mc_correct(&self) -> u32 {
        self.mc_correct
    }

    #[must_use]
    pub fn tbs_questions(&self) -> u32 {
        self.tbs_questions
    }

    #[must_use]
    pub fn tbs_correct(&self) -> u32 {
        self.tbs_correct
    }

    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// MC plus TBS questions.
    #[must_use]
    pub fn questions_answered(&self) -> u32 {
        self.mc_questions.saturating_add(self.tbs_questions)
    }

    /// MC plus TBS correct answers.
    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.mc_correct.saturating_add(self.tbs_correct)
    }

    /// Fraction of correct answers in `0.0..=1.0`, `None` without questions.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let answered = self.questions_answered();
        if answered == 0 {
            return None;
        }
        Some(f64::from(self.correct_answers()) / f64::from(answered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_today;

    fn draft() -> StudyLogDraft {
        StudyLogDraft::new(StudyLogId::new(1), fixed_today(), ChapterId::new("FAR-1"), 1.5)
    }

    #[test]
    fn validated_log_sums_question_types() {
        let log = draft().with_mc(20, 15).with_tbs(2, 1).validate().unwrap();
        assert_eq!(log.questions_answered(), 22);
        assert_eq!(log.correct_answers(), 16);
        assert!((log.accuracy().unwrap() - 16.0 / 22.0).abs() < 1e-12);
    }

    #[test]
    fn accuracy_is_none_without_questions() {
        let log = draft().validate().unwrap();
        assert_eq!(log.accuracy(), None);
    }

    #[test]
    fn rejects_negative_or_nan_hours() {
        let mut bad = draft();
        bad.study_hours = -0.5;
        assert!(matches!(
            bad.validate(),
            Err(StudyLogError::InvalidHours { .. })
        ));

        let mut nan = draft();
        nan.study_hours = f64::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_more_correct_than_questions() {
        let err = draft().with_tbs(1, 2).validate().unwrap_err();
        assert_eq!(
            err,
            StudyLogError::CorrectExceedsQuestions {
                kind: "TBS",
                correct: 2,
                questions: 1
            }
        );
    }

    #[test]
    fn deserializes_camel_case_and_ignores_denormalized_fields() {
        let log: StudyLog = serde_json::from_str(
            r#"{
                "id": 9,
                "date": "2023-11-01",
                "chapterId": "REG-4",
                "section": "REG",
                "chapterTitle": "Individual Taxation",
                "studyHours": 2.0,
                "mcQuestions": 10,
                "mcCorrect": 7,
                "memo": "  basis rules  "
            }"#,
        )
        .unwrap();
        assert_eq!(log.chapter_id(), &ChapterId::new("REG-4"));
        assert_eq!(log.questions_answered(), 10);
        assert_eq!(log.memo(), "basis rules");
    }
}
