use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use study_core::{ChapterRetention, Clock};

use crate::analytics::{
    AllocationRecommendation, CalibrationEntry, CoverageItem, PaceResult, RiskItem, RiskLevel,
    analyze_coverage, calculate_all_section_paces, calibrate_retention, count_by_level,
    detect_risks, recommend_allocation,
};
use crate::index::LogIndex;
use crate::mock_exams::{MockExamSummary, summarize_mock_exams};
use crate::progress::{ReviewQueue, SectionProgress, build_review_queue, summarize_sections};
use crate::snapshot::StudySnapshot;

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Every analytics view computed for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub as_of: NaiveDate,
    pub retentions: Vec<ChapterRetention>,
    pub review_queue: ReviewQueue,
    pub progress: Vec<SectionProgress>,
    pub paces: Vec<PaceResult>,
    pub risks: Vec<RiskItem>,
    pub risk_counts: BTreeMap<RiskLevel, usize>,
    pub calibration: Vec<CalibrationEntry>,
    pub allocation: Vec<AllocationRecommendation>,
    pub coverage: Vec<CoverageItem>,
    pub mock_exams: Vec<MockExamSummary>,
    /// Study logs skipped because their chapter is not in the catalog.
    pub orphaned_logs: usize,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Runs the analytics engines over a snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsService {
    clock: Clock,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Day the service reports on.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Build the full report for the clock's current day.
    #[must_use]
    pub fn report(&self, snapshot: &StudySnapshot) -> AnalyticsReport {
        self.report_as_of(snapshot, self.today())
    }

    /// Build the full report for an explicit day.
    ///
    /// Logs are indexed once and retentions computed once from the index;
    /// every view reads from those. Duplicate catalog entries count once.
    #[must_use]
    pub fn report_as_of(&self, snapshot: &StudySnapshot, as_of: NaiveDate) -> AnalyticsReport {
        let span = tracing::info_span!("analytics_report", %as_of);
        let _guard = span.enter();

        let index = LogIndex::build(&snapshot.chapters, &snapshot.study_logs);
        let retentions = index.retentions(as_of);
        let goals = &snapshot.goals;

        let paces = calculate_all_section_paces(&index, goals, as_of);
        let risks = detect_risks(&index, &retentions, goals, as_of);
        let risk_counts = count_by_level(&risks);
        let allocation = recommend_allocation(&index, &paces, &retentions, goals, as_of);
        let coverage = analyze_coverage(&index, &retentions, goals, as_of);
        let calibration = calibrate_retention(&index, &snapshot.recall_records);
        let progress = summarize_sections(&index, &retentions);
        let review_queue = build_review_queue(&retentions);
        let mock_exams = summarize_mock_exams(&snapshot.mock_exams);

        tracing::info!(
            chapters = index.len(),
            risks = risks.len(),
            overdue = review_queue.overdue.len(),
            "analytics report ready"
        );

        AnalyticsReport {
            as_of,
            retentions,
            review_queue,
            progress,
            paces,
            risks,
            risk_counts,
            calibration,
            allocation,
            coverage,
            mock_exams,
            orphaned_logs: index.orphaned_logs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use study_core::model::{Chapter, ChapterId, Section, StudyLogDraft, StudyLogId};
    use study_core::time::{fixed_clock, fixed_today};

    fn snapshot() -> StudySnapshot {
        let chapters = vec![
            Chapter::new(ChapterId::new("FAR-1"), Section::Far, 1, "Framework").unwrap(),
            Chapter::new(ChapterId::new("FAR-2"), Section::Far, 2, "Revenue").unwrap(),
        ];
        let study_logs = vec![
            StudyLogDraft::new(
                StudyLogId::new(1),
                fixed_today() - Days::new(10),
                ChapterId::new("FAR-1"),
                2.0,
            )
            .validate()
            .unwrap(),
        ];
        StudySnapshot {
            chapters,
            study_logs,
            ..StudySnapshot::default()
        }
    }

    #[test]
    fn report_uses_service_clock() {
        let service = AnalyticsService::new(fixed_clock());
        let report = service.report(&snapshot());
        assert_eq!(report.as_of, fixed_today());
        assert_eq!(report.retentions.len(), 2);
        assert_eq!(report.paces.len(), 5);
        assert_eq!(report.review_queue.overdue, vec![ChapterId::new("FAR-1")]);
        assert_eq!(report.review_queue.never_studied, vec![ChapterId::new("FAR-2")]);
        assert_eq!(report.orphaned_logs, 0);
    }

    #[test]
    fn explicit_day_overrides_clock() {
        let service = AnalyticsService::new(fixed_clock());
        let day = fixed_today() - Days::new(10);
        let report = service.report_as_of(&snapshot(), day);
        assert_eq!(report.as_of, day);
        let far1 = &report.retentions[0];
        assert_eq!(far1.retention, 100);
        assert!(far1.is_due_today || far1.is_coming_up);
    }

    #[test]
    fn duplicate_catalog_entries_are_reported_once() {
        let mut snapshot = snapshot();
        snapshot.chapters.push(snapshot.chapters[0].clone());
        assert!(snapshot.validate().is_err());

        let report = AnalyticsService::new(fixed_clock()).report(&snapshot);
        assert_eq!(report.retentions.len(), 2);
        assert_eq!(report.review_queue.overdue, vec![ChapterId::new("FAR-1")]);
        let fragile = report
            .coverage
            .iter()
            .filter(|item| item.chapter_id == ChapterId::new("FAR-1"))
            .count();
        assert_eq!(fragile, 1);
        assert_eq!(report.progress[0].total_chapters, 2);
    }

    #[test]
    fn idle_sections_report_positive_zero_hours() {
        let report = AnalyticsService::new(fixed_clock()).report(&snapshot());
        for pace in &report.paces {
            assert!(pace.weekly_actual_hours.is_sign_positive(), "{:?}", pace.section);
        }
        for rec in &report.allocation {
            assert!(rec.current_hours.is_sign_positive(), "{:?}", rec.section);
            assert!(rec.recommended_hours.is_sign_positive(), "{:?}", rec.section);
        }
    }

    #[test]
    fn report_is_deterministic() {
        let service = AnalyticsService::new(fixed_clock());
        let snapshot = snapshot();
        assert_eq!(service.report(&snapshot), service.report(&snapshot));
    }
}
