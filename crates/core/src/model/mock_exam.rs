use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::chapter::Section;
use crate::model::ids::MockExamId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MockExamError {
    #[error("mock exam source cannot be empty")]
    EmptySource,

    #[error("{kind} correct answers ({correct}) exceed questions ({questions})")]
    CorrectExceedsQuestions {
        kind: &'static str,
        correct: u32,
        questions: u32,
    },
}

/// One practice-exam attempt. Displayed only; no engine consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MockExamDraft")]
pub struct MockExam {
    id: MockExamId,
    date: NaiveDate,
    section: Section,
    source: String,
    mc_questions: u32,
    mc_correct: u32,
    tbs_questions: u32,
    tbs_correct: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExamDraft {
    pub id: MockExamId,
    pub date: NaiveDate,
    pub section: Section,
    pub source: String,
    #[serde(default)]
    pub mc_questions: u32,
    #[serde(default)]
    pub mc_correct: u32,
    #[serde(default)]
    pub tbs_questions: u32,
    #[serde(default)]
    pub tbs_correct: u32,
}

impl MockExamDraft {
    /// # Errors
    ///
    /// Returns `MockExamError::EmptySource` for a blank source label and
    /// `MockExamError::CorrectExceedsQuestions` for impossible counts.
    pub fn validate(self) -> Result<MockExam, MockExamError> {
        let source = self.source.trim().to_string();
        if source.is_empty() {
            return Err(MockExamError::EmptySource);
        }
        for (kind, questions, correct) in [
            ("MC", self.mc_questions, self.mc_correct),
            ("TBS", self.tbs_questions, self.tbs_correct),
        ] {
            if correct > questions {
                return Err(MockExamError::CorrectExceedsQuestions {
                    kind,
                    correct,
                    questions,
                });
            }
        }

        Ok(MockExam {
            id: self.id,
            date: self.date,
            section: self.section,
            source,
            mc_questions: self.mc_questions,
            mc_correct: self.mc_correct,
            tbs_questions: self.tbs_questions,
            tbs_correct: self.tbs_correct,
        })
    }
}

impl TryFrom<MockExamDraft> for MockExam {
    type Error = MockExamError;

    fn try_from(draft: MockExamDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl MockExam {
    #[must_use]
    pub fn id(&self) -> MockExamId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.mc_questions.saturating_add(self.tbs_questions)
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.mc_correct.saturating_add(self.tbs_correct)
    }

    /// Score as a percentage, `None` when the attempt had no questions.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total_questions();
        if total == 0 {
            return None;
        }
        Some(f64::from(self.total_correct()) * 100.0 / f64::from(total))
    }
}
