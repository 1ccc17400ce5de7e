use chrono::NaiveDate;
use serde::Serialize;
use study_core::ChapterRetention;
use study_core::model::{Section, StudyGoals};

use super::pace::{PACE_TOLERANCE_DAYS, PaceResult, PaceStatus};
use crate::index::LogIndex;

/// Trailing window used to measure current hours per section.
pub const ALLOCATION_WINDOW_DAYS: u64 = 28;

/// Sections this far ahead of schedule give hours back.
pub const AHEAD_RELEASE_DAYS: i64 = 14;

pub const BEHIND_INCREASE_SHARE: f64 = 0.5;
pub const BEHIND_INCREASE_CAP_HOURS: f64 = 3.0;
pub const AHEAD_KEEP_SHARE: f64 = 0.7;
pub const AHEAD_FLOOR_HOURS: f64 = 1.0;

/// More overdue chapters than this force extra review time.
pub const REVIEW_DEBT_OVERDUE_CHAPTERS: usize = 3;
pub const REVIEW_DEBT_MIN_INCREASE_HOURS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AllocationReason {
    /// No study in the window; the weekly budget was split evenly.
    NoHistory,
    #[serde(rename_all = "camelCase")]
    Behind { delay_days: i64 },
    #[serde(rename_all = "camelCase")]
    Ahead { delay_days: i64 },
    #[serde(rename_all = "camelCase")]
    ReviewDebt { overdue_chapters: usize },
}

/// Suggested weekly hours for one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRecommendation {
    pub section: Section,
    pub current_hours: f64,
    pub recommended_hours: f64,
    /// `recommended_hours - current_hours`.
    pub change: f64,
    pub reasons: Vec<AllocationReason>,
}

/// Redistribute the weekly budget across sections.
///
/// Starts from actual weekly hours per section, grows sections that are
/// behind, shrinks those comfortably ahead, forces extra time where review
/// debt piles up, then rescales everything to `daily_study_hours * 7`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recommend_allocation(
    index: &LogIndex<'_>,
    paces: &[PaceResult],
    retentions: &[ChapterRetention],
    goals: &StudyGoals,
    as_of: NaiveDate,
) -> Vec<AllocationRecommendation> {
    let budget = goals.weekly_budget_hours();
    let even_share = budget / Section::ALL.len() as f64;

    let current: Vec<f64> = Section::ALL
        .iter()
        .map(|section| index.weekly_average_hours(Some(*section), as_of, ALLOCATION_WINDOW_DAYS))
        .collect();
    let has_history = current.iter().any(|hours| *hours > 0.0);

    let mut recommendations: Vec<AllocationRecommendation> = Section::ALL
        .iter()
        .zip(&current)
        .map(|(&section, &current_hours)| {
            let mut reasons = Vec::new();
            let base = if has_history {
                current_hours
            } else {
                reasons.push(AllocationReason::NoHistory);
                even_share
            };
            let mut recommended = base;

            if let Some(pace) = paces.iter().find(|p| p.section == section) {
                match pace.status {
                    PaceStatus::Behind if pace.delay_days > PACE_TOLERANCE_DAYS => {
                        recommended += (base * BEHIND_INCREASE_SHARE).min(BEHIND_INCREASE_CAP_HOURS);
                        reasons.push(AllocationReason::Behind {
                            delay_days: pace.delay_days,
                        });
                    }
                    PaceStatus::Ahead if pace.delay_days < -AHEAD_RELEASE_DAYS => {
                        recommended = (base * AHEAD_KEEP_SHARE).max(AHEAD_FLOOR_HOURS);
                        reasons.push(AllocationReason::Ahead {
                            delay_days: pace.delay_days,
                        });
                    }
                    _ => {}
                }
            }

            let overdue_chapters = retentions
                .iter()
                .filter(|r| r.section == section && r.is_overdue)
                .count();
            if overdue_chapters > REVIEW_DEBT_OVERDUE_CHAPTERS {
                recommended = recommended.max(base + REVIEW_DEBT_MIN_INCREASE_HOURS);
                reasons.push(AllocationReason::ReviewDebt { overdue_chapters });
            }

            AllocationRecommendation {
                section,
                current_hours,
                recommended_hours: recommended,
                change: 0.0,
                reasons,
            }
        })
        .collect();

    normalize_to_budget(&mut recommendations, budget);
    for rec in &mut recommendations {
        rec.change = rec.recommended_hours - rec.current_hours;
    }
    recommendations
}

/// Scale recommended hours so they sum to `budget`, keeping proportions.
#[allow(clippy::cast_precision_loss)]
fn normalize_to_budget(recommendations: &mut [AllocationRecommendation], budget: f64) {
    if recommendations.is_empty() {
        return;
    }
    if budget <= 0.0 {
        for rec in recommendations.iter_mut() {
            rec.recommended_hours = 0.0;
        }
        return;
    }

    let total: f64 = recommendations.iter().map(|r| r.recommended_hours).sum();
    if total <= 0.0 {
        let even = budget / recommendations.len() as f64;
        for rec in recommendations.iter_mut() {
            rec.recommended_hours = even;
        }
        return;
    }

    let scale = budget / total;
    for rec in recommendations.iter_mut() {
        rec.recommended_hours *= scale;
    }
}
