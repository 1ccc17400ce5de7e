//! Per-chapter grouping of study logs, built once and shared by every view.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};
use study_core::ChapterRetention;
use study_core::model::{Chapter, ChapterId, Section, StudyLog};
use study_core::time::window_start;

/// Catalog entry together with its sessions in chronological order.
#[derive(Debug, Clone)]
pub struct ChapterLogs<'a> {
    pub chapter: &'a Chapter,
    pub sessions: Vec<&'a StudyLog>,
}

impl ChapterLogs<'_> {
    #[must_use]
    pub fn is_studied(&self) -> bool {
        !self.sessions.is_empty()
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.sessions.iter().fold(0.0, |acc, log| acc + log.study_hours())
    }
}

/// Read-only index over a chapter catalog and the logs that reference it.
#[derive(Debug, Clone)]
pub struct LogIndex<'a> {
    entries: Vec<ChapterLogs<'a>>,
    positions: HashMap<&'a ChapterId, usize>,
    orphaned: usize,
}

impl<'a> LogIndex<'a> {
    /// Group `logs` by chapter, keeping catalog order.
    ///
    /// Sessions are sorted by date; same-day sessions keep their input order.
    /// Logs whose chapter is not in the catalog are dropped.
    #[must_use]
    pub fn build(chapters: &'a [Chapter], logs: &'a [StudyLog]) -> Self {
        let mut entries: Vec<ChapterLogs<'a>> = Vec::with_capacity(chapters.len());
        let mut positions = HashMap::with_capacity(chapters.len());
        for chapter in chapters {
            if positions.contains_key(chapter.id()) {
                tracing::warn!(chapter = %chapter.id(), "duplicate chapter in catalog ignored");
                continue;
            }
            positions.insert(chapter.id(), entries.len());
            entries.push(ChapterLogs {
                chapter,
                sessions: Vec::new(),
            });
        }

        let mut orphaned = 0;
        for log in logs {
            match positions.get(log.chapter_id()) {
                Some(&pos) => entries[pos].sessions.push(log),
                None => {
                    orphaned += 1;
                    tracing::warn!(
                        log = %log.id(),
                        chapter = %log.chapter_id(),
                        "study log refers to a chapter missing from the catalog"
                    );
                }
            }
        }

        for entry in &mut entries {
            entry.sessions.sort_by_key(|log| log.date());
        }

        Self {
            entries,
            positions,
            orphaned,
        }
    }

    /// All catalog entries in catalog order.
    pub fn chapters(&self) -> impl Iterator<Item = &ChapterLogs<'a>> {
        self.entries.iter()
    }

    /// Catalog entries belonging to `section`.
    pub fn section_chapters(&self, section: Section) -> impl Iterator<Item = &ChapterLogs<'a>> {
        self.entries
            .iter()
            .filter(move |entry| entry.chapter.section() == section)
    }

    #[must_use]
    pub fn get(&self, id: &ChapterId) -> Option<&ChapterLogs<'a>> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }

    /// Sessions of one chapter, oldest first; empty for unknown chapters.
    #[must_use]
    pub fn sessions_for(&self, id: &ChapterId) -> &[&'a StudyLog] {
        match self.get(id) {
            Some(entry) => &entry.sessions,
            None => &[],
        }
    }

    #[must_use]
    pub fn section_of(&self, id: &ChapterId) -> Option<Section> {
        self.get(id).map(|entry| entry.chapter.section())
    }

    /// Number of chapters in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logs that could not be attached to a catalog chapter.
    #[must_use]
    pub fn orphaned_logs(&self) -> usize {
        self.orphaned
    }

    /// Every indexed session with its section.
    pub fn sessions(&self) -> impl Iterator<Item = (Section, &'a StudyLog)> + '_ {
        self.entries.iter().flat_map(|entry| {
            let section = entry.chapter.section();
            entry.sessions.iter().map(move |log| (section, *log))
        })
    }

    /// Hours logged between `from` and `to` inclusive, optionally for one section.
    #[must_use]
    pub fn hours_between(&self, section: Option<Section>, from: NaiveDate, to: NaiveDate) -> f64 {
        self.sessions()
            .filter(|(s, _)| section.is_none_or(|wanted| wanted == *s))
            .filter(|(_, log)| (from..=to).contains(&log.date()))
            .fold(0.0, |acc, (_, log)| acc + log.study_hours())
    }

    /// Average weekly hours over the trailing `days` days ending at `as_of`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn weekly_average_hours(&self, section: Option<Section>, as_of: NaiveDate, days: u64) -> f64 {
        if days == 0 {
            return 0.0;
        }
        let hours = self.hours_between(section, window_start(as_of, days), as_of);
        hours / (days as f64 / 7.0)
    }

    /// Retention state of every indexed chapter, in catalog order.
    ///
    /// Duplicate catalog entries were dropped at build time, so each chapter
    /// appears once.
    #[must_use]
    pub fn retentions(&self, as_of: NaiveDate) -> Vec<ChapterRetention> {
        self.entries
            .iter()
            .map(|entry| {
                let dates: BTreeSet<NaiveDate> = entry.sessions.iter().map(|log| log.date()).collect();
                ChapterRetention::from_study_dates(entry.chapter, &dates, as_of)
            })
            .collect()
    }

    /// Total hours for each of the trailing `weeks` weeks, most recent first.
    ///
    /// Week `k` covers `as_of - 7k - 6 ..= as_of - 7k`.
    #[must_use]
    pub fn trailing_weekly_hours(&self, as_of: NaiveDate, weeks: u64) -> Vec<f64> {
        (0..weeks)
            .map(|k| {
                let end = as_of
                    .checked_sub_days(Days::new(7 * k))
                    .unwrap_or(NaiveDate::MIN);
                self.hours_between(None, window_start(end, 7), end)
            })
            .collect()
    }
}
