use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use study_core::model::{ChapterId, RecallRating, RecallRecord, Section};

use crate::index::LogIndex;

/// Absolute gap (percentage points) tolerated before suggesting a change.
pub const CALIBRATION_GAP_THRESHOLD: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalibrationAdvice {
    /// The model overestimates recall: review sooner.
    Shorten,
    /// The model underestimates recall: the review can wait.
    Extend,
    OnTrack,
}

/// Predicted vs. self-reported retention for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationEntry {
    pub chapter_id: ChapterId,
    pub section: Section,
    pub recorded_on: NaiveDate,
    pub rating: RecallRating,
    pub actual_retention: u8,
    pub predicted_retention: u8,
    /// `actual - predicted`.
    pub gap: i32,
    pub recommendation: CalibrationAdvice,
}

#[must_use]
pub fn advise(gap: i32) -> CalibrationAdvice {
    if gap < -CALIBRATION_GAP_THRESHOLD {
        CalibrationAdvice::Shorten
    } else if gap > CALIBRATION_GAP_THRESHOLD {
        CalibrationAdvice::Extend
    } else {
        CalibrationAdvice::OnTrack
    }
}

/// Compare each chapter's latest recall check with the prediction made then.
///
/// Largest absolute gaps come first. Records for chapters outside the catalog
/// are skipped.
#[must_use]
pub fn calibrate_retention(index: &LogIndex<'_>, records: &[RecallRecord]) -> Vec<CalibrationEntry> {
    let mut latest: BTreeMap<&ChapterId, &RecallRecord> = BTreeMap::new();
    for record in records {
        let slot = latest.entry(record.chapter_id()).or_insert(record);
        if record.recorded_on() >= slot.recorded_on() {
            *slot = record;
        }
    }

    let mut entries: Vec<CalibrationEntry> = latest
        .into_values()
        .filter_map(|record| {
            let Some(section) = index.section_of(record.chapter_id()) else {
                tracing::warn!(chapter = %record.chapter_id(), "recall record for unknown chapter skipped");
                return None;
            };
            let actual_retention = record.rating().actual_retention();
            let predicted_retention = record.predicted_retention();
            let gap = i32::from(actual_retention) - i32::from(predicted_retention);
            Some(CalibrationEntry {
                chapter_id: record.chapter_id().clone(),
                section,
                recorded_on: record.recorded_on(),
                rating: record.rating(),
                actual_retention,
                predicted_retention,
                gap,
                recommendation: advise(gap),
            })
        })
        .collect();

    entries.sort_by_key(|entry| std::cmp::Reverse(entry.gap.unsigned_abs()));
    entries
}
