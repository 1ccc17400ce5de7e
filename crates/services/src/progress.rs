use serde::Serialize;
use study_core::model::{ChapterId, Section};
use study_core::{ChapterRetention, MasteryLevel};

use crate::index::LogIndex;

/// Aggregated study progress of one section, useful for UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub section: Section,
    pub total_chapters: usize,
    pub studied_chapters: usize,
    pub mastered_chapters: usize,
    pub total_hours: f64,
    pub questions_answered: u32,
    pub correct_answers: u32,
    /// Percentage; `None` without answered questions.
    pub accuracy: Option<f64>,
    /// Mean retention of studied chapters; `None` when nothing was studied.
    pub average_retention: Option<f64>,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_sections(
    index: &LogIndex<'_>,
    retentions: &[ChapterRetention],
) -> Vec<SectionProgress> {
    Section::ALL
        .into_iter()
        .map(|section| {
            let mut total_hours = 0.0;
            let mut questions_answered = 0_u32;
            let mut correct_answers = 0_u32;
            let mut total_chapters = 0;
            for entry in index.section_chapters(section) {
                total_chapters += 1;
                for log in &entry.sessions {
                    total_hours += log.study_hours();
                    questions_answered = questions_answered.saturating_add(log.questions_answered());
                    correct_answers = correct_answers.saturating_add(log.correct_answers());
                }
            }

            let studied: Vec<&ChapterRetention> = retentions
                .iter()
                .filter(|r| r.section == section && r.is_studied())
                .collect();
            let mastered_chapters = studied
                .iter()
                .filter(|r| r.mastery_level == MasteryLevel::Mastered)
                .count();
            let average_retention = (!studied.is_empty()).then(|| {
                studied.iter().map(|r| f64::from(r.retention)).sum::<f64>() / studied.len() as f64
            });
            let accuracy = (questions_answered > 0)
                .then(|| f64::from(correct_answers) * 100.0 / f64::from(questions_answered));

            SectionProgress {
                section,
                total_chapters,
                studied_chapters: studied.len(),
                mastered_chapters,
                total_hours,
                questions_answered,
                correct_answers,
                accuracy,
                average_retention,
            }
        })
        .collect()
}

/// Chapters grouped by what the learner should do next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQueue {
    /// Previously studied and below the overdue line, weakest first.
    pub overdue: Vec<ChapterId>,
    /// Due today but not overdue, weakest first.
    pub due_today: Vec<ChapterId>,
    /// Due within the next week, soonest first.
    pub coming_up: Vec<ChapterId>,
    pub never_studied: Vec<ChapterId>,
}

impl ReviewQueue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty()
            && self.due_today.is_empty()
            && self.coming_up.is_empty()
            && self.never_studied.is_empty()
    }
}

#[must_use]
pub fn build_review_queue(retentions: &[ChapterRetention]) -> ReviewQueue {
    let mut overdue: Vec<&ChapterRetention> = Vec::new();
    let mut due_today: Vec<&ChapterRetention> = Vec::new();
    let mut coming_up: Vec<&ChapterRetention> = Vec::new();
    let mut never_studied = Vec::new();

    for r in retentions {
        if !r.is_studied() {
            never_studied.push(r.chapter_id.clone());
        } else if r.is_overdue {
            overdue.push(r);
        } else if r.is_due_today {
            due_today.push(r);
        } else if r.is_coming_up {
            coming_up.push(r);
        }
    }

    overdue.sort_by_key(|r| r.retention);
    due_today.sort_by_key(|r| r.retention);
    coming_up.sort_by_key(|r| r.next_review_date);

    let ids = |list: Vec<&ChapterRetention>| -> Vec<ChapterId> {
        list.into_iter().map(|r| r.chapter_id.clone()).collect()
    };
    ReviewQueue {
        overdue: ids(overdue),
        due_today: ids(due_today),
        coming_up: ids(coming_up),
        never_studied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use study_core::compute_all_chapter_retentions;
    use study_core::model::{Chapter, StudyLog, StudyLogDraft, StudyLogId};
    use study_core::time::fixed_today;

    fn chapter(id: &str, section: Section) -> Chapter {
        Chapter::new(ChapterId::new(id), section, 1, id).unwrap()
    }

    fn log(id: u64, chapter_id: &str, days_ago: u64, mc: (u32, u32)) -> StudyLog {
        StudyLogDraft::new(
            StudyLogId::new(id),
            fixed_today() - Days::new(days_ago),
            ChapterId::new(chapter_id),
            1.5,
        )
        .with_mc(mc.0, mc.1)
        .validate()
        .unwrap()
    }

    #[test]
    fn section_progress_rolls_up_logs_and_retention() {
        let chapters = vec![
            chapter("FAR-1", Section::Far),
            chapter("FAR-2", Section::Far),
            chapter("FAR-3", Section::Far),
        ];
        let logs = vec![
            log(1, "FAR-1", 0, (10, 8)),
            log(2, "FAR-1", 0, (10, 6)),
            log(3, "FAR-2", 10, (0, 0)),
        ];
        let index = LogIndex::build(&chapters, &logs);
        let retentions = compute_all_chapter_retentions(&chapters, &logs, fixed_today());

        let progress = summarize_sections(&index, &retentions);
        assert_eq!(progress.len(), 5);
        let far = &progress[0];
        assert_eq!(far.total_chapters, 3);
        assert_eq!(far.studied_chapters, 2);
        assert_eq!(far.mastered_chapters, 0);
        assert!((far.total_hours - 4.5).abs() < 1e-9);
        assert_eq!(far.questions_answered, 20);
        assert!((far.accuracy.unwrap() - 70.0).abs() < 1e-9);
        // FAR-1 at 100, FAR-2 at 0
        assert!((far.average_retention.unwrap() - 50.0).abs() < 1e-9);

        let aud = &progress[1];
        assert_eq!(aud.total_chapters, 0);
        assert_eq!(aud.accuracy, None);
        assert_eq!(aud.average_retention, None);
    }

    #[test]
    fn review_queue_buckets_and_orders() {
        let chapters = vec![
            chapter("A", Section::Reg),
            chapter("B", Section::Reg),
            chapter("C", Section::Reg),
            chapter("D", Section::Reg),
            chapter("E", Section::Reg),
            chapter("F", Section::Reg),
        ];
        let logs = vec![
            // A: overdue, retention 0
            log(1, "A", 12, (0, 0)),
            // B: overdue, retention 25 (one study day, two days ago)
            log(2, "B", 2, (0, 0)),
            // C: due today, retention 50
            log(3, "C", 1, (0, 0)),
            // D: three study days, last today -> due in 7
            log(4, "D", 9, (0, 0)),
            log(5, "D", 4, (0, 0)),
            log(6, "D", 0, (0, 0)),
            // E: two study days, last today -> due in 3
            log(7, "E", 5, (0, 0)),
            log(8, "E", 0, (0, 0)),
        ];
        let retentions = compute_all_chapter_retentions(&chapters, &logs, fixed_today());
        let queue = build_review_queue(&retentions);

        assert_eq!(queue.overdue, vec![ChapterId::new("A"), ChapterId::new("B")]);
        assert_eq!(queue.due_today, vec![ChapterId::new("C")]);
        assert_eq!(queue.coming_up, vec![ChapterId::new("E"), ChapterId::new("D")]);
        assert_eq!(queue.never_studied, vec![ChapterId::new("F")]);
        assert!(!queue.is_empty());
    }
}
