use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::ChapterId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter title cannot be empty")]
    EmptyTitle,

    #[error("chapter number must be > 0")]
    InvalidNumber,

    #[error("unknown exam section: {0}")]
    UnknownSection(String),
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Exam section a chapter belongs to.
///
/// Declaration order is the display and sort order used across reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Section {
    /// Financial Accounting and Reporting
    Far,
    /// Auditing and Attestation
    Aud,
    /// Regulation
    Reg,
    /// Business Analysis and Reporting
    Bar,
    /// Tax Compliance and Planning
    Tcp,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Far,
        Section::Aud,
        Section::Reg,
        Section::Bar,
        Section::Tcp,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Section::Far => "FAR",
            Section::Aud => "AUD",
            Section::Reg => "REG",
            Section::Bar => "BAR",
            Section::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Section {
    type Err = ChapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Section::ALL
            .into_iter()
            .find(|section| section.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ChapterError::UnknownSection(code.to_string()))
    }
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// Static catalog entry. Never mutated by the engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ChapterDraft")]
pub struct Chapter {
    id: ChapterId,
    section: Section,
    number: u32,
    title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterDraft {
    pub id: ChapterId,
    pub section: Section,
    pub number: u32,
    pub title: String,
}

impl TryFrom<ChapterDraft> for Chapter {
    type Error = ChapterError;

    fn try_from(draft: ChapterDraft) -> Result<Self, Self::Error> {
        Chapter::new(draft.id, draft.section, draft.number, draft.title)
    }
}

impl Chapter {
    /// Creates a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::InvalidNumber` for chapter number 0 and
    /// `ChapterError::EmptyTitle` for a blank title.
    pub fn new(
        id: ChapterId,
        section: Section,
        number: u32,
        title: impl Into<String>,
    ) -> Result<Self, ChapterError> {
        if number == 0 {
            return Err(ChapterError::InvalidNumber);
        }
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ChapterError::EmptyTitle);
        }

        Ok(Self {
            id,
            section,
            number,
            title,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}
