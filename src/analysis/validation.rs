use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::models::{RawTestResult, Report, TestResult, TestStatus};

use super::types::ReportError;

/// Validate raw results with the default configuration.
pub fn validate(results: &[RawTestResult]) -> Result<Report, ReportError> {
    validate_with(results, &EngineConfig::default())
}

/// Validate raw results into a `Report`, preserving input order.
///
/// Fails on the first offending result. Duplicate test names are kept as
/// separate entries and only logged.
pub fn validate_with(
    results: &[RawTestResult],
    config: &EngineConfig,
) -> Result<Report, ReportError> {
    if results.is_empty() {
        return Err(ReportError::EmptyReport);
    }

    let mut validated = Vec::with_capacity(results.len());
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, raw) in results.iter().enumerate() {
        let result = validate_one(index, raw, config)?;

        if !seen.insert(raw.test.as_str()) {
            tracing::warn!(test = %raw.test, index, "Duplicate test name in report");
        }

        validated.push(result);
    }

    Ok(Report::from_validated(validated))
}

fn validate_one(
    index: usize,
    raw: &RawTestResult,
    config: &EngineConfig,
) -> Result<TestResult, ReportError> {
    if raw.test.trim().is_empty() {
        return Err(ReportError::EmptyTestName { index });
    }

    for (field, number) in [("value", raw.value), ("min", raw.min), ("max", raw.max)] {
        if !number.is_finite() {
            return Err(ReportError::NonFiniteValue {
                test: raw.test.clone(),
                field,
            });
        }
    }

    if raw.min >= raw.max {
        return Err(ReportError::DegenerateRange {
            test: raw.test.clone(),
            min: raw.min,
            max: raw.max,
        });
    }

    let supplied: TestStatus = raw.status.parse().map_err(|_| ReportError::InvalidStatus {
        test: raw.test.clone(),
        value: raw.status.clone(),
    })?;

    let classified = TestStatus::classify(raw.value, raw.min, raw.max);
    let status = if supplied == classified {
        supplied
    } else if config.recompute_status {
        tracing::warn!(
            test = %raw.test,
            supplied = %supplied,
            classified = %classified,
            "Replacing status inconsistent with reference range"
        );
        classified
    } else {
        tracing::debug!(
            test = %raw.test,
            supplied = %supplied,
            classified = %classified,
            "Supplied status disagrees with reference range, trusting it"
        );
        supplied
    };

    Ok(TestResult {
        test: raw.test.clone(),
        value: raw.value,
        min: raw.min,
        max: raw.max,
        unit: raw.unit.clone(),
        status,
    })
}
