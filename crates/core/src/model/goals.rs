use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::chapter::Section;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GoalsError {
    #[error("{field} must be finite and non-negative, got {provided}")]
    InvalidHours { field: &'static str, provided: f64 },

    #[error("daily study hours cannot exceed 24, got {0}")]
    HoursExceedDay(f64),

    #[error("target score for {section} must be within 0-100, got {provided}")]
    InvalidTargetScore { section: Section, provided: u8 },
}

//
// ─── SECTION GOAL ──────────────────────────────────────────────────────────────
//

/// Exam date and target score for one section. Both are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGoal {
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_score: Option<u8>,
}

impl SectionGoal {
    #[must_use]
    pub fn with_exam_date(exam_date: NaiveDate) -> Self {
        Self {
            exam_date: Some(exam_date),
            target_score: None,
        }
    }

    /// Days from `as_of` until the exam, negative once it has passed.
    #[must_use]
    pub fn days_until_exam(&self, as_of: NaiveDate) -> Option<i64> {
        self.exam_date
            .map(|exam| exam.signed_duration_since(as_of).num_days())
    }

    /// True when the exam falls within `0..=days` days of `as_of`.
    #[must_use]
    pub fn exam_within(&self, as_of: NaiveDate, days: i64) -> bool {
        self.days_until_exam(as_of)
            .is_some_and(|until| (0..=days).contains(&until))
    }
}

//
// ─── STUDY GOALS ───────────────────────────────────────────────────────────────
//

/// User-editable study targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StudyGoalsDraft")]
pub struct StudyGoals {
    sections: BTreeMap<Section, SectionGoal>,
    daily_study_hours: f64,
    weekend_study_hours: f64,
    questions_per_session: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGoalsDraft {
    #[serde(default)]
    pub sections: BTreeMap<Section, SectionGoal>,
    #[serde(default = "default_daily_hours")]
    pub daily_study_hours: f64,
    #[serde(default = "default_weekend_hours")]
    pub weekend_study_hours: f64,
    #[serde(default = "default_questions_per_session")]
    pub questions_per_session: u32,
}

const DEFAULT_DAILY_HOURS: f64 = 3.0;
const DEFAULT_WEEKEND_HOURS: f64 = 6.0;
const DEFAULT_QUESTIONS_PER_SESSION: u32 = 30;

fn default_daily_hours() -> f64 {
    DEFAULT_DAILY_HOURS
}

fn default_weekend_hours() -> f64 {
    DEFAULT_WEEKEND_HOURS
}

fn default_questions_per_session() -> u32 {
    DEFAULT_QUESTIONS_PER_SESSION
}

impl Default for StudyGoalsDraft {
    fn default() -> Self {
        Self {
            sections: BTreeMap::new(),
            daily_study_hours: DEFAULT_DAILY_HOURS,
            weekend_study_hours: DEFAULT_WEEKEND_HOURS,
            questions_per_session: DEFAULT_QUESTIONS_PER_SESSION,
        }
    }
}

impl StudyGoalsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exam_date(mut self, section: Section, date: NaiveDate) -> Self {
        self.sections.entry(section).or_default().exam_date = Some(date);
        self
    }

    #[must_use]
    pub fn target_score(mut self, section: Section, score: u8) -> Self {
        self.sections.entry(section).or_default().target_score = Some(score);
        self
    }

    #[must_use]
    pub fn daily_hours(mut self, hours: f64) -> Self {
        self.daily_study_hours = hours;
        self
    }

    /// Validate the draft into goals the engines can consume.
    ///
    /// # Errors
    ///
    /// Returns `GoalsError` for negative, non-finite or impossible hour targets and
    /// for target scores above 100.
    pub fn validate(self) -> Result<StudyGoals, GoalsError> {
        check_hours("daily study hours", self.daily_study_hours)?;
        check_hours("weekend study hours", self.weekend_study_hours)?;
        if self.daily_study_hours > 24.0 {
            return Err(GoalsError::HoursExceedDay(self.daily_study_hours));
        }
        for (section, goal) in &self.sections {
            if let Some(score) = goal.target_score {
                if score > 100 {
                    return Err(GoalsError::InvalidTargetScore {
                        section: *section,
                        provided: score,
                    });
                }
            }
        }

        Ok(StudyGoals {
            sections: self.sections,
            daily_study_hours: self.daily_study_hours,
            weekend_study_hours: self.weekend_study_hours,
            questions_per_session: self.questions_per_session,
        })
    }
}

fn check_hours(field: &'static str, hours: f64) -> Result<(), GoalsError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(GoalsError::InvalidHours {
            field,
            provided: hours,
        });
    }
    Ok(())
}

impl TryFrom<StudyGoalsDraft> for StudyGoals {
    type Error = GoalsError;

    fn try_from(draft: StudyGoalsDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Default for StudyGoals {
    fn default() -> Self {
        Self {
            sections: BTreeMap::new(),
            daily_study_hours: DEFAULT_DAILY_HOURS,
            weekend_study_hours: DEFAULT_WEEKEND_HOURS,
            questions_per_session: DEFAULT_QUESTIONS_PER_SESSION,
        }
    }
}

impl StudyGoals {
    /// Goal for `section`; an empty goal when none was configured.
    #[must_use]
    pub fn section(&self, section: Section) -> SectionGoal {
        self.sections.get(&section).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn exam_date(&self, section: Section) -> Option<NaiveDate> {
        self.section(section).exam_date
    }

    /// True when any section's exam falls within `0..=days` days of `as_of`.
    #[must_use]
    pub fn any_exam_within(&self, as_of: NaiveDate, days: i64) -> bool {
        self.sections
            .values()
            .any(|goal| goal.exam_within(as_of, days))
    }

    #[must_use]
    pub fn daily_study_hours(&self) -> f64 {
        self.daily_study_hours
    }

    #[must_use]
    pub fn weekend_study_hours(&self) -> f64 {
        self.weekend_study_hours
    }

    #[must_use]
    pub fn questions_per_session(&self) -> u32 {
        self.questions_per_session
    }

    /// Hours available per week, `daily_study_hours * 7`.
    #[must_use]
    pub fn weekly_budget_hours(&self) -> f64 {
        self.daily_study_hours * 7.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_today;
    use chrono::Days;

    #[test]
    fn defaults_have_no_exam_dates() {
        let goals = StudyGoals::default();
        for section in Section::ALL {
            assert_eq!(goals.exam_date(section), None);
        }
        assert!((goals.weekly_budget_hours() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn draft_builder_sets_section_goals() {
        let exam = fixed_today() + Days::new(45);
        let goals = StudyGoalsDraft::new()
            .exam_date(Section::Far, exam)
            .target_score(Section::Far, 80)
            .daily_hours(4.0)
            .validate()
            .unwrap();

        assert_eq!(goals.exam_date(Section::Far), Some(exam));
        assert_eq!(goals.section(Section::Far).target_score, Some(80));
        assert_eq!(goals.section(Section::Far).days_until_exam(fixed_today()), Some(45));
        assert!(goals.any_exam_within(fixed_today(), 60));
        assert!(!goals.any_exam_within(fixed_today(), 30));
    }

    #[test]
    fn past_exam_is_not_within_window() {
        let past = fixed_today() - Days::new(3);
        let goal = SectionGoal::with_exam_date(past);
        assert_eq!(goal.days_until_exam(fixed_today()), Some(-3));
        assert!(!goal.exam_within(fixed_today(), 30));
    }

    #[test]
    fn rejects_invalid_hours_and_scores() {
        assert!(matches!(
            StudyGoalsDraft::new().daily_hours(-1.0).validate(),
            Err(GoalsError::InvalidHours { .. })
        ));
        assert!(matches!(
            StudyGoalsDraft::new().daily_hours(25.0).validate(),
            Err(GoalsError::HoursExceedDay(_))
        ));
        assert!(matches!(
            StudyGoalsDraft::new().target_score(Section::Aud, 120).validate(),
            Err(GoalsError::InvalidTargetScore {
                section: Section::Aud,
                provided: 120
            })
        ));
    }

    #[test]
    fn deserializes_partial_settings_with_defaults() {
        let goals: StudyGoals = serde_json::from_str(
            r#"{"sections":{"REG":{"examDate":"2024-01-15"}},"dailyStudyHours":2.5}"#,
        )
        .unwrap();
        assert_eq!(
            goals.exam_date(Section::Reg),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(goals.questions_per_session(), 30);
        assert!((goals.weekly_budget_hours() - 17.5).abs() < 1e-9);
    }
}
