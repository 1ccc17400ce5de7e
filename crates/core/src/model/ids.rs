use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier for a chapter, e.g. `FAR-03`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    /// Creates a new `ChapterId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a study log entry
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyLogId(u64);

impl StudyLogId {
    /// Creates a new `StudyLogId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Unique identifier for a mock exam attempt
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MockExamId(u64);

impl MockExamId {
    /// Creates a new `MockExamId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChapterId({})", self.0)
    }
}

impl fmt::Debug for StudyLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StudyLogId({})", self.0)
    }
}

impl fmt::Debug for MockExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MockExamId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StudyLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MockExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ChapterId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError { kind: "ChapterId" });
        }
        Ok(ChapterId::new(trimmed))
    }
}

impl FromStr for StudyLogId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(StudyLogId::new)
            .map_err(|_| ParseIdError { kind: "StudyLogId" })
    }
}

impl FromStr for MockExamId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(MockExamId::new)
            .map_err(|_| ParseIdError { kind: "MockExamId" })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_id_display() {
        let id = ChapterId::new("FAR-03");
        assert_eq!(id.to_string(), "FAR-03");
    }

    #[test]
    fn test_chapter_id_from_str_trims() {
        let id: ChapterId = "  AUD-1 ".parse().unwrap();
        assert_eq!(id, ChapterId::new("AUD-1"));
    }

    #[test]
    fn test_chapter_id_from_str_rejects_blank() {
        assert!("   ".parse::<ChapterId>().is_err());
    }

    #[test]
    fn test_study_log_id_from_str() {
        let id: StudyLogId = "123".parse().unwrap();
        assert_eq!(id, StudyLogId::new(123));
        assert!("abc".parse::<StudyLogId>().is_err());
    }

    #[test]
    fn test_mock_exam_id_display() {
        assert_eq!(MockExamId::new(7).to_string(), "7");
    }

    #[test]
    fn test_chapter_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ChapterId::new("REG-2")).unwrap();
        assert_eq!(json, "\"REG-2\"");
    }
}
