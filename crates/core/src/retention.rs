//! Forgetting-curve retention model.
//!
//! Memory decays as `R(t) = e^(-t / S)` where `t` is days since the last study
//! day and `S` is the stability. Stability is derived from how many distinct
//! days a chapter has been studied: each review count maps to an interval from
//! [`REVIEW_INTERVAL_DAYS`] (doubling past the end of the table), and `S` is
//! chosen so that retention is exactly 50% when that interval has elapsed.
//!
//! Everything here is a pure function of its arguments. "Today" is always
//! passed in as `as_of`.

use std::collections::{BTreeSet, HashMap};
use std::f64::consts::LN_2;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Chapter, ChapterId, Section, StudyLog};
use crate::time::days_between;

//
// ─── CONSTANTS ─────────────────────────────────────────────────────────────────
//

/// Review interval in days for review #1 through #5.
pub const REVIEW_INTERVAL_DAYS: [u64; 5] = [1, 3, 7, 14, 30];

/// Stability used before the first review.
pub const INITIAL_STABILITY_DAYS: f64 = 1.0;

/// Previously studied chapters below this retention are overdue.
pub const OVERDUE_RETENTION_THRESHOLD: u8 = 30;

/// Reviews required before a chapter can count as mastered.
pub const MASTERY_MIN_REVIEWS: u32 = 5;

/// Mastered chapters must keep retention strictly above this value.
pub const MASTERY_MIN_RETENTION: u8 = 50;

/// Horizon for the "coming up" review bucket.
pub const COMING_UP_WINDOW_DAYS: i64 = 7;

//
// ─── MASTERY ───────────────────────────────────────────────────────────────────
//

/// Coarse classification of a chapter's memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MasteryLevel {
    New,
    Learning,
    Reviewing,
    Mastered,
}

//
// ─── MODEL FUNCTIONS ───────────────────────────────────────────────────────────
//

/// Interval in days attached to the `review_count`-th review.
///
/// Counts 1 to 5 read [`REVIEW_INTERVAL_DAYS`]; every further review doubles
/// the last interval (`30 * 2^(n - 5)`), saturating at `u64::MAX`. A count of
/// zero has no interval and returns 0.
#[must_use]
pub fn review_interval_days(review_count: u32) -> u64 {
    let table_len = REVIEW_INTERVAL_DAYS.len();
    match usize::try_from(review_count) {
        Ok(0) => 0,
        Ok(n) if n <= table_len => REVIEW_INTERVAL_DAYS[n - 1],
        _ => {
            let last = REVIEW_INTERVAL_DAYS[table_len - 1];
            #[allow(clippy::cast_possible_truncation)]
            let extra = review_count - table_len as u32;
            2_u64
                .checked_pow(extra)
                .map_or(u64::MAX, |factor| last.saturating_mul(factor))
        }
    }
}

/// Decay constant in days for a chapter reviewed `review_count` times.
///
/// Zero reviews decay fastest ([`INITIAL_STABILITY_DAYS`]); otherwise the
/// stability puts the 50% point exactly at [`review_interval_days`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_stability(review_count: u32) -> f64 {
    if review_count == 0 {
        return INITIAL_STABILITY_DAYS;
    }
    review_interval_days(review_count) as f64 / LN_2
}

/// Retention percentage after `days_since_study` days at the given stability.
///
/// Returns 100 for zero or negative elapsed days and 0 for a degenerate
/// (non-positive or non-finite) stability.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn calculate_retention(days_since_study: i64, stability: f64) -> u8 {
    if days_since_study <= 0 {
        return 100;
    }
    if !stability.is_finite() || stability <= 0.0 {
        return 0;
    }
    let retention = 100.0 * (-(days_since_study as f64) / stability).exp();
    retention.round().clamp(0.0, 100.0) as u8
}

/// Day the next review falls due.
///
/// A chapter with no reviews is due on `as_of`; otherwise the review interval
/// for `review_count` is added to `last_study_date`.
#[must_use]
pub fn calculate_next_review_date(
    last_study_date: NaiveDate,
    review_count: u32,
    as_of: NaiveDate,
) -> NaiveDate {
    if review_count == 0 {
        return as_of;
    }
    last_study_date
        .checked_add_days(Days::new(review_interval_days(review_count)))
        .unwrap_or(NaiveDate::MAX)
}

/// Mastery from review effort and current retention.
///
/// Not monotonic in `review_count`: five or more reviews only count as
/// mastered while retention stays above [`MASTERY_MIN_RETENTION`].
#[must_use]
pub fn determine_mastery_level(review_count: u32, retention: u8) -> MasteryLevel {
    match review_count {
        0 => MasteryLevel::New,
        1 | 2 => MasteryLevel::Learning,
        n if n >= MASTERY_MIN_REVIEWS && retention > MASTERY_MIN_RETENTION => {
            MasteryLevel::Mastered
        }
        _ => MasteryLevel::Reviewing,
    }
}

//
// ─── URGENCY ───────────────────────────────────────────────────────────────────
//

/// Review urgency flags derived from retention and the review schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewUrgency {
    pub is_overdue: bool,
    pub is_due_today: bool,
    pub is_coming_up: bool,
}

impl ReviewUrgency {
    /// Classify from the number of days until the next review.
    ///
    /// `is_overdue` needs at least one review: a never-studied chapter is due
    /// but never overdue.
    #[must_use]
    pub fn classify(days_until_review: i64, review_count: u32, retention: u8) -> Self {
        let is_overdue = review_count > 0 && retention < OVERDUE_RETENTION_THRESHOLD;
        let is_due_today = days_until_review <= 0;
        let is_coming_up =
            !is_overdue && (1..=COMING_UP_WINDOW_DAYS).contains(&days_until_review);

        Self {
            is_overdue,
            is_due_today,
            is_coming_up,
        }
    }
}

//
// ─── CHAPTER RETENTION ─────────────────────────────────────────────────────────
//

/// Derived memory state of one chapter on one day. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRetention {
    pub chapter_id: ChapterId,
    pub section: Section,
    /// 0-100, rounded.
    pub retention: u8,
    /// `None` when the chapter has never been studied.
    pub days_since_last_study: Option<i64>,
    pub last_study_date: Option<NaiveDate>,
    /// Distinct study days, not log entries.
    pub review_count: u32,
    pub mastery_level: MasteryLevel,
    pub stability: f64,
    pub next_review_date: NaiveDate,
    pub days_until_review: i64,
    pub is_overdue: bool,
    pub is_due_today: bool,
    pub is_coming_up: bool,
}

impl ChapterRetention {
    /// Build the retention state for `chapter` from its distinct study days.
    #[must_use]
    pub fn from_study_dates(
        chapter: &Chapter,
        study_dates: &BTreeSet<NaiveDate>,
        as_of: NaiveDate,
    ) -> Self {
        let review_count = u32::try_from(study_dates.len()).unwrap_or(u32::MAX);
        let last_study_date = study_dates.last().copied();
        let days_since_last_study = last_study_date.map(|last| days_between(last, as_of));
        let stability = calculate_stability(review_count);
        let retention =
            days_since_last_study.map_or(0, |days| calculate_retention(days, stability));
        let mastery_level = determine_mastery_level(review_count, retention);
        let next_review_date = calculate_next_review_date(
            last_study_date.unwrap_or(as_of),
            review_count,
            as_of,
        );
        let days_until_review = days_between(as_of, next_review_date);
        let urgency = ReviewUrgency::classify(days_until_review, review_count, retention);

        Self {
            chapter_id: chapter.id().clone(),
            section: chapter.section(),
            retention,
            days_since_last_study,
            last_study_date,
            review_count,
            mastery_level,
            stability,
            next_review_date,
            days_until_review,
            is_overdue: urgency.is_overdue,
            is_due_today: urgency.is_due_today,
            is_coming_up: urgency.is_coming_up,
        }
    }

    #[must_use]
    pub fn is_studied(&self) -> bool {
        self.review_count > 0
    }

    #[must_use]
    pub fn urgency(&self) -> ReviewUrgency {
        ReviewUrgency {
            is_overdue: self.is_overdue,
            is_due_today: self.is_due_today,
            is_coming_up: self.is_coming_up,
        }
    }
}

/// Retention state for every chapter in `chapters`, in catalog order.
///
/// Chapters without logs are included as `New`. Logs for chapters missing
/// from the catalog are ignored.
#[must_use]
pub fn compute_all_chapter_retentions(
    chapters: &[Chapter],
    logs: &[StudyLog],
    as_of: NaiveDate,
) -> Vec<ChapterRetention> {
    let mut study_dates: HashMap<&ChapterId, BTreeSet<NaiveDate>> = HashMap::new();
    for log in logs {
        study_dates
            .entry(log.chapter_id())
            .or_default()
            .insert(log.date());
    }

    let empty = BTreeSet::new();
    chapters
        .iter()
        .map(|chapter| {
            let dates = study_dates.get(chapter.id()).unwrap_or(&empty);
            ChapterRetention::from_study_dates(chapter, dates, as_of)
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
