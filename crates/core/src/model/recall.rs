use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ChapterId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecallError {
    #[error("invalid recall rating value: {0}")]
    InvalidRating(u8),

    #[error("predicted retention must be within 0-100, got {0}")]
    InvalidPrediction(u8),
}

//
// ─── RECALL RATING ────────────────────────────────────────────────────────────
//

/// Four-level self-assessment of how well a chapter was remembered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecallRating {
    /// Could not recall the material.
    Forgot,
    /// Recognised it but could not reproduce it.
    Vague,
    /// Recalled most of it with effort.
    Partial,
    /// Recalled it fully.
    Solid,
}

impl RecallRating {
    /// Converts a numeric rating (0-3) to a `RecallRating`.
    ///
    /// # Errors
    ///
    /// Returns `RecallError::InvalidRating` if the value is not in the range 0-3.
    pub fn from_u8(value: u8) -> Result<Self, RecallError> {
        match value {
            0 => Ok(Self::Forgot),
            1 => Ok(Self::Vague),
            2 => Ok(Self::Partial),
            3 => Ok(Self::Solid),
            _ => Err(RecallError::InvalidRating(value)),
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            RecallRating::Forgot => 0,
            RecallRating::Vague => 1,
            RecallRating::Partial => 2,
            RecallRating::Solid => 3,
        }
    }

    /// Retention percentage this rating stands in for when calibrating.
    #[must_use]
    pub fn actual_retention(self) -> u8 {
        match self {
            RecallRating::Forgot => 10,
            RecallRating::Vague => 40,
            RecallRating::Partial => 70,
            RecallRating::Solid => 95,
        }
    }
}

impl TryFrom<u8> for RecallRating {
    type Error = RecallError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<RecallRating> for u8 {
    fn from(rating: RecallRating) -> Self {
        rating.as_u8()
    }
}

//
// ─── RECALL RECORD ────────────────────────────────────────────────────────────
//

/// A self-rated recall check paired with the prediction shown at that moment.
///
/// Only consumed by calibration; it never feeds back into retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecallRecordDraft")]
pub struct RecallRecord {
    chapter_id: ChapterId,
    recorded_on: NaiveDate,
    rating: RecallRating,
    predicted_retention: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallRecordDraft {
    pub chapter_id: ChapterId,
    pub recorded_on: NaiveDate,
    pub rating: RecallRating,
    pub predicted_retention: u8,
}

impl TryFrom<RecallRecordDraft> for RecallRecord {
    type Error = RecallError;

    fn try_from(draft: RecallRecordDraft) -> Result<Self, Self::Error> {
        RecallRecord::new(
            draft.chapter_id,
            draft.recorded_on,
            draft.rating,
            draft.predicted_retention,
        )
    }
}

impl RecallRecord {
    /// # Errors
    ///
    /// Returns `RecallError::InvalidPrediction` if `predicted_retention` exceeds 100.
    pub fn new(
        chapter_id: ChapterId,
        recorded_on: NaiveDate,
        rating: RecallRating,
        predicted_retention: u8,
    ) -> Result<Self, RecallError> {
        if predicted_retention > 100 {
            return Err(RecallError::InvalidPrediction(predicted_retention));
        }
        Ok(Self {
            chapter_id,
            recorded_on,
            rating,
            predicted_retention,
        })
    }

    #[must_use]
    pub fn chapter_id(&self) -> &ChapterId {
        &self.chapter_id
    }

    #[must_use]
    pub fn recorded_on(&self) -> NaiveDate {
        self.recorded_on
    }

    #[must_use]
    pub fn rating(&self) -> RecallRating {
        self.rating
    }

    #[must_use]
    pub fn predicted_retention(&self) -> u8 {
        self.predicted_retention
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
