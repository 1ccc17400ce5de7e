use chrono::NaiveDate;
use serde::Serialize;
use study_core::model::{MockExam, Section};

/// Practice-exam results of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockExamSummary {
    pub section: Section,
    pub attempts: usize,
    pub latest_date: NaiveDate,
    pub latest_accuracy: Option<f64>,
    pub best_accuracy: Option<f64>,
    pub average_accuracy: Option<f64>,
}

/// One summary per section that has at least one attempt, in section order.
///
/// Attempts without questions count as attempts but not toward accuracy.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_mock_exams(exams: &[MockExam]) -> Vec<MockExamSummary> {
    Section::ALL
        .into_iter()
        .filter_map(|section| {
            let attempts: Vec<&MockExam> = exams.iter().filter(|e| e.section() == section).collect();
            // max_by_key returns the last maximum, so same-day ties go to the later entry
            let latest = attempts.iter().max_by_key(|e| e.date())?;
            let scores: Vec<f64> = attempts.iter().filter_map(|e| e.accuracy()).collect();
            let best_accuracy = scores.iter().copied().reduce(f64::max);
            let average_accuracy =
                (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

            Some(MockExamSummary {
                section,
                attempts: attempts.len(),
                latest_date: latest.date(),
                latest_accuracy: latest.accuracy(),
                best_accuracy,
                average_accuracy,
            })
        })
        .collect()
}
