mod allocation;
mod calibration;
mod coverage;
mod pace;
mod risk;

pub use allocation::{AllocationReason, AllocationRecommendation, recommend_allocation};
pub use calibration::{CalibrationAdvice, CalibrationEntry, advise, calibrate_retention};
pub use coverage::{CoverageItem, CoverageKind, CoverageUrgency, analyze_coverage};
pub use pace::{
    PaceResult, PaceStatus, UNESTIMABLE_DELAY_DAYS, calculate_all_section_paces, calculate_pace,
};
pub use risk::{
    RiskId, RiskItem, RiskLevel, coefficient_of_variation, count_by_level, detect_cramming_risk,
    detect_review_debt_risk, detect_risks, detect_stagnation_risk, detect_untouched_risk,
    detect_variance_risk,
};
