//! Study-pattern risk detection.
//!
//! Five independent checks, each yielding at most one [`RiskItem`]:
//! review debt, cramming, stagnation, untouched coverage and weekly variance.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use study_core::ChapterRetention;
use study_core::model::{ChapterId, StudyGoals};
use study_core::time::window_start;

use crate::index::LogIndex;

pub const REVIEW_DEBT_WARNING: usize = 2;
pub const REVIEW_DEBT_CRITICAL: usize = 5;

pub const CRAMMING_WINDOW_DAYS: u64 = 14;
pub const CRAMMING_PURE_NEW_CHAPTERS: usize = 3;
pub const CRAMMING_RATIO_WARNING: f64 = 2.5;
pub const CRAMMING_RATIO_CRITICAL: f64 = 4.0;

pub const STAGNATION_SESSIONS: usize = 3;
pub const STAGNATION_WARNING_CHAPTERS: usize = 3;

pub const UNTOUCHED_WARNING_SHARE: f64 = 0.5;
pub const UNTOUCHED_CRITICAL_SHARE: f64 = 0.6;
pub const UNTOUCHED_EXAM_HORIZON_DAYS: i64 = 30;

pub const VARIANCE_WEEKS: u64 = 4;
pub const VARIANCE_CV_WARNING: f64 = 0.5;
pub const VARIANCE_CV_CRITICAL: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskId {
    ReviewDebt,
    Cramming,
    Stagnation,
    Untouched,
    Variance,
}

/// Severity; sorts most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskItem {
    pub id: RiskId,
    pub level: RiskLevel,
    pub title: String,
    pub message: String,
    /// The measured quantity that triggered the risk (count, ratio, share or CV).
    pub metric: f64,
    /// Chapters implicated, when the check is chapter based.
    pub chapter_ids: Vec<ChapterId>,
}

impl RiskItem {
    fn new(id: RiskId, level: RiskLevel, title: &str, message: String, metric: f64) -> Self {
        Self {
            id,
            level,
            title: title.to_string(),
            message,
            metric,
            chapter_ids: Vec::new(),
        }
    }

    fn with_chapters(mut self, chapter_ids: Vec<ChapterId>) -> Self {
        self.chapter_ids = chapter_ids;
        self
    }
}

/// Too many previously studied chapters have fallen below the overdue line.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_review_debt_risk(retentions: &[ChapterRetention]) -> Option<RiskItem> {
    let overdue: Vec<ChapterId> = retentions
        .iter()
        .filter(|r| r.is_overdue)
        .map(|r| r.chapter_id.clone())
        .collect();
    let count = overdue.len();

    let level = if count > REVIEW_DEBT_CRITICAL {
        RiskLevel::Critical
    } else if count > REVIEW_DEBT_WARNING {
        RiskLevel::Warning
    } else {
        return None;
    };

    Some(
        RiskItem::new(
            RiskId::ReviewDebt,
            level,
            "Review debt",
            format!("{count} chapters are overdue for review"),
            count as f64,
        )
        .with_chapters(overdue),
    )
}

/// Recent study is dominated by first-time chapters with little review.
///
/// Inside the trailing window a chapter with exactly one session is "new",
/// one with more is "review".
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_cramming_risk(index: &LogIndex<'_>, as_of: NaiveDate) -> Option<RiskItem> {
    let from = window_start(as_of, CRAMMING_WINDOW_DAYS);
    let mut new_chapters = Vec::new();
    let mut review_chapters = 0_usize;
    for entry in index.chapters() {
        let sessions = entry
            .sessions
            .iter()
            .filter(|log| (from..=as_of).contains(&log.date()))
            .count();
        match sessions {
            0 => {}
            1 => new_chapters.push(entry.chapter.id().clone()),
            _ => review_chapters += 1,
        }
    }
    let new_count = new_chapters.len();

    if review_chapters == 0 {
        if new_count > CRAMMING_PURE_NEW_CHAPTERS {
            return Some(
                RiskItem::new(
                    RiskId::Cramming,
                    RiskLevel::Critical,
                    "Cramming",
                    format!(
                        "{new_count} new chapters in the last {CRAMMING_WINDOW_DAYS} days without a single review"
                    ),
                    new_count as f64,
                )
                .with_chapters(new_chapters),
            );
        }
        return None;
    }
    if new_count == 0 {
        return None;
    }

    let ratio = new_count as f64 / review_chapters as f64;
    let level = if ratio > CRAMMING_RATIO_CRITICAL {
        RiskLevel::Critical
    } else if ratio > CRAMMING_RATIO_WARNING {
        RiskLevel::Warning
    } else {
        return None;
    };

    Some(
        RiskItem::new(
            RiskId::Cramming,
            level,
            "Cramming",
            format!(
                "{new_count} new chapters against {review_chapters} reviewed in the last {CRAMMING_WINDOW_DAYS} days (ratio {ratio:.1})"
            ),
            ratio,
        )
        .with_chapters(new_chapters),
    )
}

/// Chapters whose accuracy has not improved over their last three sessions.
///
/// Only sessions with answered questions are considered.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_stagnation_risk(index: &LogIndex<'_>) -> Option<RiskItem> {
    let stagnant: Vec<ChapterId> = index
        .chapters()
        .filter_map(|entry| {
            let accuracies: Vec<f64> = entry
                .sessions
                .iter()
                .filter_map(|log| log.accuracy())
                .collect();
            if accuracies.len() < STAGNATION_SESSIONS {
                return None;
            }
            let recent = &accuracies[accuracies.len() - STAGNATION_SESSIONS..];
            let baseline = recent[0];
            recent[1..]
                .iter()
                .all(|acc| *acc <= baseline)
                .then(|| entry.chapter.id().clone())
        })
        .collect();
    let count = stagnant.len();

    let level = if count >= STAGNATION_WARNING_CHAPTERS {
        RiskLevel::Warning
    } else if count >= 1 {
        RiskLevel::Info
    } else {
        return None;
    };

    Some(
        RiskItem::new(
            RiskId::Stagnation,
            level,
            "Stagnating accuracy",
            format!("{count} chapters show no accuracy gain over their last {STAGNATION_SESSIONS} sessions"),
            count as f64,
        )
        .with_chapters(stagnant),
    )
}

/// A large share of the catalog has never been studied.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_untouched_risk(
    retentions: &[ChapterRetention],
    goals: &StudyGoals,
    as_of: NaiveDate,
) -> Option<RiskItem> {
    if retentions.is_empty() {
        return None;
    }
    let untouched = retentions.iter().filter(|r| !r.is_studied()).count();
    let share = untouched as f64 / retentions.len() as f64;
    let exam_soon = goals.any_exam_within(as_of, UNTOUCHED_EXAM_HORIZON_DAYS);

    let level = if share > UNTOUCHED_CRITICAL_SHARE && exam_soon {
        RiskLevel::Critical
    } else if share > UNTOUCHED_WARNING_SHARE {
        RiskLevel::Warning
    } else {
        return None;
    };

    let percent = (share * 100.0).round();
    let message = if exam_soon {
        format!("{percent}% of chapters are untouched with an exam within {UNTOUCHED_EXAM_HORIZON_DAYS} days")
    } else {
        format!("{percent}% of chapters have never been studied")
    };
    Some(RiskItem::new(
        RiskId::Untouched,
        level,
        "Untouched chapters",
        message,
        share,
    ))
}

/// Week-to-week study hours swing too much (coefficient of variation).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn detect_variance_risk(index: &LogIndex<'_>, as_of: NaiveDate) -> Option<RiskItem> {
    let weekly = index.trailing_weekly_hours(as_of, VARIANCE_WEEKS);
    let cv = coefficient_of_variation(&weekly)?;

    let level = if cv > VARIANCE_CV_CRITICAL {
        RiskLevel::Critical
    } else if cv > VARIANCE_CV_WARNING {
        RiskLevel::Warning
    } else {
        return None;
    };

    Some(RiskItem::new(
        RiskId::Variance,
        level,
        "Inconsistent schedule",
        format!(
            "weekly study hours over the last {VARIANCE_WEEKS} weeks vary by {:.0}% of their mean",
            cv * 100.0
        ),
        cv,
    ))
}

/// Population standard deviation over mean; `None` for an empty or zero-mean sample.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean)
}

/// Run every check and order the findings by severity.
#[must_use]
pub fn detect_risks(
    index: &LogIndex<'_>,
    retentions: &[ChapterRetention],
    goals: &StudyGoals,
    as_of: NaiveDate,
) -> Vec<RiskItem> {
    let mut risks: Vec<RiskItem> = [
        detect_review_debt_risk(retentions),
        detect_cramming_risk(index, as_of),
        detect_stagnation_risk(index),
        detect_untouched_risk(retentions, goals, as_of),
        detect_variance_risk(index, as_of),
    ]
    .into_iter()
    .flatten()
    .collect();

    for risk in &risks {
        tracing::debug!(id = ?risk.id, level = ?risk.level, metric = risk.metric, "risk detected");
    }

    risks.sort_by_key(|risk| risk.level);
    risks
}

/// Count of risks per level, for summaries.
#[must_use]
pub fn count_by_level(risks: &[RiskItem]) -> BTreeMap<RiskLevel, usize> {
    let mut counts = BTreeMap::new();
    for risk in risks {
        *counts.entry(risk.level).or_insert(0) += 1;
    }
    counts
}
