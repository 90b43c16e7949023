use crate::models::{Report, TestResult, TestStatus};

use super::types::RangePosition;

/// Default deviation above which an abnormal result is significantly out of range.
pub const CRITICAL_DEVIATION: f64 = 0.5;

/// Distance of the value from the range midpoint, in half-ranges.
/// Exactly 1.0 at either bound, 0.0 at the midpoint.
pub fn deviation(result: &TestResult) -> f64 {
    (result.value - result.midpoint()).abs() / result.half_range()
}

pub fn is_critical(result: &TestResult, threshold: f64) -> bool {
    result.status != TestStatus::Normal && deviation(result) > threshold
}

/// Results significantly out of range, in report order.
pub fn critical_tests(report: &Report) -> Vec<TestResult> {
    critical_tests_with(report, CRITICAL_DEVIATION)
}

pub fn critical_tests_with(report: &Report, threshold: f64) -> Vec<TestResult> {
    report
        .iter()
        .filter(|r| is_critical(r, threshold))
        .cloned()
        .collect()
}

/// Every non-Normal result, in report order.
pub fn attention_tests(report: &Report) -> Vec<TestResult> {
    report
        .iter()
        .filter(|r| r.status.is_abnormal())
        .cloned()
        .collect()
}

/// Marker placement for the range comparison bar, which spans `0..max * 1.5`.
/// `None` when `max` is not positive and the bar has no width.
pub fn range_position(result: &TestResult) -> Option<RangePosition> {
    let span = result.max * 1.5;
    if span <= 0.0 {
        return None;
    }
    let pct = |x: f64| x / span * 100.0;
    Some(RangePosition {
        normal_start: pct(result.min),
        normal_end: pct(result.max),
        marker: pct(result.value).clamp(0.0, 100.0),
    })
}
