use services::analytics::{CalibrationAdvice, CoverageKind, CoverageUrgency};
use services::{AnalyticsService, Clock, StudySnapshot};
use study_core::MasteryLevel;
use study_core::model::{ChapterId, Section};
use study_core::time::fixed_today;
use tracing_subscriber::EnvFilter;

const SNAPSHOT: &str = r#"{
    "chapters": [
        { "id": "FAR-1", "section": "FAR", "number": 1, "title": "Conceptual framework" },
        { "id": "FAR-2", "section": "FAR", "number": 2, "title": "Revenue recognition" },
        { "id": "FAR-3", "section": "FAR", "number": 3, "title": "Leases" },
        { "id": "FAR-4", "section": "FAR", "number": 4, "title": "Consolidation" },
        { "id": "AUD-1", "section": "AUD", "number": 1, "title": "Professional ethics" }
    ],
    "studyLogs": [
        { "id": 1, "date": "2023-11-04", "chapterId": "FAR-1", "studyHours": 2.0,
          "mcQuestions": 10, "mcCorrect": 6 },
        { "id": 2, "date": "2023-11-14", "chapterId": "FAR-2", "studyHours": 1.5,
          "mcQuestions": 20, "mcCorrect": 15 },
        { "id": 3, "date": "2023-11-13", "chapterId": "AUD-1", "studyHours": 1.0 }
    ],
    "goals": {
        "sections": { "FAR": { "examDate": "2023-12-14", "targetScore": 75 } },
        "dailyStudyHours": 2.0
    },
    "recallRecords": [
        { "chapterId": "FAR-1", "recordedOn": "2023-11-14", "rating": 0, "predictedRetention": 60 }
    ],
    "mockExams": [
        { "id": 1, "date": "2023-11-12", "section": "FAR", "source": "Practice A",
          "mcQuestions": 40, "mcCorrect": 28 }
    ]
}"#;

fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn snapshot_report_smoke() {
    init_logs();
    let snapshot = StudySnapshot::from_json(SNAPSHOT).unwrap();
    let service = AnalyticsService::new(Clock::fixed(fixed_today()));
    let report = service.report(&snapshot);

    assert_eq!(report.as_of, fixed_today());
    assert_eq!(report.retentions.len(), 5);

    let far1 = &report.retentions[0];
    assert_eq!(far1.retention, 0);
    assert!(far1.is_overdue);
    assert_eq!(far1.mastery_level, MasteryLevel::Learning);
    assert_eq!(report.review_queue.overdue, vec![ChapterId::new("FAR-1")]);
    assert_eq!(
        report.review_queue.never_studied,
        vec![ChapterId::new("FAR-3"), ChapterId::new("FAR-4")]
    );

    let far_pace = report
        .paces
        .iter()
        .find(|p| p.section == Section::Far)
        .unwrap();
    assert_eq!(far_pace.completed_chapters, 2);
    assert_eq!(far_pace.remaining_chapters, 2);
    assert_eq!(far_pace.days_until_exam, Some(30));

    let coverage: Vec<(&str, CoverageKind, CoverageUrgency)> = report
        .coverage
        .iter()
        .map(|c| (c.chapter_id.as_str(), c.kind, c.urgency))
        .collect();
    assert_eq!(
        coverage,
        vec![
            ("FAR-1", CoverageKind::Fragile, CoverageUrgency::Urgent),
            ("FAR-3", CoverageKind::Untouched, CoverageUrgency::Urgent),
            ("FAR-4", CoverageKind::Untouched, CoverageUrgency::Urgent),
        ]
    );

    assert_eq!(report.calibration.len(), 1);
    assert_eq!(report.calibration[0].gap, -50);
    assert_eq!(report.calibration[0].recommendation, CalibrationAdvice::Shorten);

    let budget: f64 = report.allocation.iter().map(|a| a.recommended_hours).sum();
    assert!((budget - 14.0).abs() < 1e-9);

    assert_eq!(report.mock_exams.len(), 1);
    assert!((report.mock_exams[0].best_accuracy.unwrap() - 70.0).abs() < 1e-9);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("reviewQueue").is_some());
    assert!(json.get("riskCounts").is_some());
    assert_eq!(json["retentions"][0]["masteryLevel"], "learning");
}

#[test]
fn orphaned_logs_are_counted_not_fatal() {
    init_logs();
    let snapshot: StudySnapshot = serde_json::from_str(
        r#"{
            "chapters": [ { "id": "TCP-1", "section": "TCP", "number": 1, "title": "Individual tax" } ],
            "studyLogs": [
                { "id": 1, "date": "2023-11-14", "chapterId": "TCP-1", "studyHours": 1.0 },
                { "id": 2, "date": "2023-11-14", "chapterId": "TCP-9", "studyHours": 1.0 }
            ]
        }"#,
    )
    .unwrap();
    assert!(snapshot.validate().is_err());

    let report = AnalyticsService::new(Clock::fixed(fixed_today())).report(&snapshot);
    assert_eq!(report.orphaned_logs, 1);
    assert_eq!(report.retentions.len(), 1);
    assert_eq!(report.retentions[0].retention, 100);
}
