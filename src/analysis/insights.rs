use crate::models::{InsightKind, Report, TestExplanation, TestResult};

use super::types::{Insight, ScoreSummary, TestInsight};

const ALL_NORMAL_TEXT: &str = "All tests are normal - Excellent health status!";

/// "1 test" / "3 tests"
fn count_tests(count: usize) -> String {
    if count == 1 {
        "1 test".to_string()
    } else {
        format!("{count} tests")
    }
}

fn insight(kind: InsightKind, icon: &str, text: String) -> Insight {
    Insight {
        kind,
        icon: icon.to_string(),
        text,
    }
}

/// Quick insights in display order: positives, then warnings, then critical.
/// Rules are evaluated in a fixed sequence and never re-sorted.
pub fn insights(report: &Report, summary: &ScoreSummary, critical: &[TestResult]) -> Vec<Insight> {
    let mut out = Vec::new();

    if summary.normal_count > 0 {
        out.push(insight(
            InsightKind::Positive,
            "✅",
            format!("{} within normal range.", count_tests(summary.normal_count)),
        ));
    }

    if summary.normal_count == report.len() {
        out.push(insight(
            InsightKind::Positive,
            "🎉",
            ALL_NORMAL_TEXT.to_string(),
        ));
    }

    if summary.high_count > 0 {
        out.push(insight(
            InsightKind::Warning,
            "⚠️",
            format!("{} above normal range.", count_tests(summary.high_count)),
        ));
    }

    if summary.low_count > 0 {
        out.push(insight(
            InsightKind::Warning,
            "⬇️",
            format!("{} below normal range.", count_tests(summary.low_count)),
        ));
    }

    if !critical.is_empty() {
        out.push(insight(
            InsightKind::Critical,
            "🚨",
            format!("{} significantly out of range.", count_tests(critical.len())),
        ));
    }

    out
}

/// One detail card per result, in report order. The explanation is the first
/// one supplied for that test name, if any.
pub fn test_insights(report: &Report, explanations: &[TestExplanation]) -> Vec<TestInsight> {
    report
        .iter()
        .map(|result| TestInsight {
            test: result.test.clone(),
            status: result.status,
            icon: result.status.icon().to_string(),
            explanation: explanations
                .iter()
                .find(|e| e.test == result.test)
                .map(|e| e.insight.clone()),
        })
        .collect()
}
