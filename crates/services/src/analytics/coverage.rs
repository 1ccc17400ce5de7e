use chrono::NaiveDate;
use serde::Serialize;
use study_core::ChapterRetention;
use study_core::model::{ChapterId, Section, StudyGoals};
use study_core::retention::OVERDUE_RETENTION_THRESHOLD;

use crate::index::LogIndex;

/// Untouched chapters become urgent once their exam is this close.
pub const UNTOUCHED_URGENT_HORIZON_DAYS: i64 = 60;

/// Declaration order is the sort order: fragile before untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageKind {
    /// Studied before but retention has collapsed.
    Fragile,
    /// Never studied.
    Untouched,
}

/// Declaration order is the sort order: urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageUrgency {
    Urgent,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageItem {
    pub chapter_id: ChapterId,
    pub section: Section,
    pub chapter_number: u32,
    pub title: String,
    pub kind: CoverageKind,
    pub urgency: CoverageUrgency,
    pub retention: u8,
    pub days_until_exam: Option<i64>,
}

/// Chapters that are either untouched or fragile.
///
/// Sorted urgent first, fragile before untouched, then by section and
/// chapter number.
#[must_use]
pub fn analyze_coverage(
    index: &LogIndex<'_>,
    retentions: &[ChapterRetention],
    goals: &StudyGoals,
    as_of: NaiveDate,
) -> Vec<CoverageItem> {
    let mut items: Vec<CoverageItem> = retentions
        .iter()
        .filter_map(|r| {
            let entry = index.get(&r.chapter_id)?;
            let goal = goals.section(r.section);
            let (kind, urgency) = if !r.is_studied() {
                let urgency = if goal.exam_within(as_of, UNTOUCHED_URGENT_HORIZON_DAYS) {
                    CoverageUrgency::Urgent
                } else {
                    CoverageUrgency::Normal
                };
                (CoverageKind::Untouched, urgency)
            } else if r.retention < OVERDUE_RETENTION_THRESHOLD {
                (CoverageKind::Fragile, CoverageUrgency::Urgent)
            } else {
                return None;
            };

            Some(CoverageItem {
                chapter_id: r.chapter_id.clone(),
                section: r.section,
                chapter_number: entry.chapter.number(),
                title: entry.chapter.title().to_string(),
                kind,
                urgency,
                retention: r.retention,
                days_until_exam: goal.days_until_exam(as_of),
            })
        })
        .collect();

    items.sort_by_key(|item| (item.urgency, item.kind, item.section, item.chapter_number));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use study_core::compute_all_chapter_retentions;
    use study_core::model::{Chapter, StudyGoalsDraft, StudyLog, StudyLogDraft, StudyLogId};
    use study_core::time::fixed_today;

    fn chapter(section: Section, n: u32) -> Chapter {
        Chapter::new(ChapterId::new(format!("{section}-{n}")), section, n, format!("{section} {n}")).unwrap()
    }

    fn log(id: u64, chapter_id: &str, days_ago: u64) -> StudyLog {
        StudyLogDraft::new(
            StudyLogId::new(id),
            fixed_today() - Days::new(days_ago),
            ChapterId::new(chapter_id),
            1.0,
        )
        .validate()
        .unwrap()
    }

    #[test]
    fn classifies_and_orders_items() {
        let chapters = vec![
            chapter(Section::Aud, 2),
            chapter(Section::Far, 1),
            chapter(Section::Far, 2),
            chapter(Section::Far, 3),
            chapter(Section::Reg, 1),
            chapter(Section::Reg, 2),
        ];
        let logs = vec![
            // fragile: one study day 10 days ago
            log(1, "REG-1", 10),
            // healthy: studied today
            log(2, "FAR-3", 0),
        ];
        let goals = StudyGoalsDraft::new()
            .exam_date(Section::Far, fixed_today() + Days::new(45))
            .exam_date(Section::Aud, fixed_today() + Days::new(90))
            .validate()
            .unwrap();

        let index = LogIndex::build(&chapters, &logs);
        let retentions = compute_all_chapter_retentions(&chapters, &logs, fixed_today());
        let items = analyze_coverage(&index, &retentions, &goals, fixed_today());

        let order: Vec<(&str, CoverageKind, CoverageUrgency)> = items
            .iter()
            .map(|i| (i.chapter_id.as_str(), i.kind, i.urgency))
            .collect();
        assert_eq!(
            order,
            vec![
                ("REG-1", CoverageKind::Fragile, CoverageUrgency::Urgent),
                ("FAR-1", CoverageKind::Untouched, CoverageUrgency::Urgent),
                ("FAR-2", CoverageKind::Untouched, CoverageUrgency::Urgent),
                ("AUD-2", CoverageKind::Untouched, CoverageUrgency::Normal),
                ("REG-2", CoverageKind::Untouched, CoverageUrgency::Normal),
            ]
        );
        assert_eq!(items[1].days_until_exam, Some(45));
        assert_eq!(items[3].days_until_exam, Some(90));
        assert_eq!(items[4].days_until_exam, None);
    }

    #[test]
    fn fully_covered_catalog_yields_nothing() {
        let chapters = vec![chapter(Section::Bar, 1)];
        let logs = vec![log(1, "BAR-1", 0)];
        let index = LogIndex::build(&chapters, &logs);
        let retentions = compute_all_chapter_retentions(&chapters, &logs, fixed_today());
        assert!(analyze_coverage(&index, &retentions, &StudyGoals::default(), fixed_today()).is_empty());
    }
}
