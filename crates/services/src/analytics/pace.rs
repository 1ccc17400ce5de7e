use chrono::{Days, NaiveDate};
use serde::Serialize;
use study_core::model::{Section, StudyGoals};
use study_core::time::days_between;

use crate::index::LogIndex;

/// Hours per chapter assumed before any chapter of a section has been studied.
pub const DEFAULT_HOURS_PER_CHAPTER: f64 = 2.0;

/// Trailing window used to measure the current weekly pace.
pub const PACE_WINDOW_DAYS: u64 = 28;

/// Delay beyond which a section is behind (or, negated, ahead).
pub const PACE_TOLERANCE_DAYS: i64 = 7;

/// Delay reported when no study in the window makes an estimate impossible.
///
/// This is "cannot estimate", not a day count.
pub const UNESTIMABLE_DELAY_DAYS: i64 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaceStatus {
    Ahead,
    OnTrack,
    Behind,
    NoGoal,
}

/// Progress of one section measured against its exam date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceResult {
    pub section: Section,
    pub total_chapters: usize,
    pub completed_chapters: usize,
    pub remaining_chapters: usize,
    pub avg_hours_per_chapter: f64,
    pub remaining_hours: f64,
    pub weekly_actual_hours: f64,
    pub weekly_required_hours: f64,
    pub exam_date: Option<NaiveDate>,
    pub days_until_exam: Option<i64>,
    /// `None` when the current pace cannot finish the section.
    pub estimated_completion: Option<NaiveDate>,
    /// ETA minus exam date; [`UNESTIMABLE_DELAY_DAYS`] when no ETA exists.
    pub delay_days: i64,
    pub status: PaceStatus,
}

impl PaceResult {
    #[must_use]
    pub fn is_estimable(&self) -> bool {
        self.delay_days != UNESTIMABLE_DELAY_DAYS
    }
}

/// Pace of `section`: remaining work, actual vs. required weekly hours and ETA.
///
/// A chapter counts as completed once it has at least one session.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_pace(
    section: Section,
    index: &LogIndex<'_>,
    goals: &StudyGoals,
    as_of: NaiveDate,
) -> PaceResult {
    let mut total_chapters = 0_usize;
    let mut completed_chapters = 0_usize;
    let mut completed_hours = 0.0_f64;
    for entry in index.section_chapters(section) {
        total_chapters += 1;
        if entry.is_studied() {
            completed_chapters += 1;
            completed_hours += entry.total_hours();
        }
    }
    let remaining_chapters = total_chapters - completed_chapters;

    let avg_hours_per_chapter = if completed_chapters > 0 {
        completed_hours / completed_chapters as f64
    } else {
        DEFAULT_HOURS_PER_CHAPTER
    };
    let remaining_hours = remaining_chapters as f64 * avg_hours_per_chapter;
    let weekly_actual_hours = index.weekly_average_hours(Some(section), as_of, PACE_WINDOW_DAYS);

    let exam_date = goals.exam_date(section);
    let days_until_exam = exam_date.map(|exam| days_between(as_of, exam));
    let weekly_required_hours =
        days_until_exam.map_or(0.0, |days| remaining_hours / days.max(1) as f64 * 7.0);

    let estimated_completion = if remaining_chapters == 0 {
        Some(as_of)
    } else if weekly_actual_hours > 0.0 {
        let days_needed = (remaining_hours / weekly_actual_hours * 7.0).ceil();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let days_needed = days_needed.clamp(0.0, f64::from(u32::MAX)) as u64;
        Some(
            as_of
                .checked_add_days(Days::new(days_needed))
                .unwrap_or(NaiveDate::MAX),
        )
    } else {
        None
    };

    let delay_days = match (exam_date, estimated_completion) {
        (_, None) => UNESTIMABLE_DELAY_DAYS,
        (None, Some(_)) => 0,
        (Some(exam), Some(eta)) => days_between(exam, eta),
    };

    let status = match exam_date {
        None => PaceStatus::NoGoal,
        Some(_) if delay_days > PACE_TOLERANCE_DAYS => PaceStatus::Behind,
        Some(_) if delay_days < -PACE_TOLERANCE_DAYS => PaceStatus::Ahead,
        Some(_) => PaceStatus::OnTrack,
    };

    PaceResult {
        section,
        total_chapters,
        completed_chapters,
        remaining_chapters,
        avg_hours_per_chapter,
        remaining_hours,
        weekly_actual_hours,
        weekly_required_hours,
        exam_date,
        days_until_exam,
        estimated_completion,
        delay_days,
        status,
    }
}

/// Pace for every section, in section order.
#[must_use]
pub fn calculate_all_section_paces(
    index: &LogIndex<'_>,
    goals: &StudyGoals,
    as_of: NaiveDate,
) -> Vec<PaceResult> {
    Section::ALL
        .into_iter()
        .map(|section| calculate_pace(section, index, goals, as_of))
        .collect()
}
