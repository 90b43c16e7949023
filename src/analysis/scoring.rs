use crate::config::ScoringThresholds;
use crate::models::{HealthHeadline, Report, RiskTier, TestStatus};

use super::types::ScoreSummary;

/// Score a report with the default thresholds.
pub fn score(report: &Report) -> ScoreSummary {
    score_with(report, &ScoringThresholds::default())
}

pub fn score_with(report: &Report, thresholds: &ScoringThresholds) -> ScoreSummary {
    let (mut normal_count, mut high_count, mut low_count) = (0, 0, 0);
    for result in report {
        match result.status {
            TestStatus::Normal => normal_count += 1,
            TestStatus::High => high_count += 1,
            TestStatus::Low => low_count += 1,
        }
    }
    let total_count = normal_count + high_count + low_count;
    let abnormal_count = high_count + low_count;

    let health_score = health_score(normal_count, total_count);

    ScoreSummary {
        normal_count,
        high_count,
        low_count,
        total_count,
        health_score,
        risk_tier: risk_tier(abnormal_count, thresholds),
        headline: headline(health_score, thresholds),
    }
}

/// `part / total` as a whole percentage, rounding .5 up.
///
/// Integer arithmetic keeps .5 boundaries exact (1 of 8 is 13, not 12).
pub fn rounded_percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    ((200 * part + total) / (2 * total)) as u8
}

/// Rounded normal percentage, pinned so that 100 means no abnormal results
/// and 0 means no normal ones even when rounding alone would reach them
/// (1 abnormal out of 200+ tests).
pub fn health_score(normal_count: usize, total_count: usize) -> u8 {
    let rounded = rounded_percent(normal_count, total_count);
    if normal_count == 0 {
        0
    } else if normal_count == total_count {
        100
    } else {
        rounded.clamp(1, 99)
    }
}

/// Absolute-count bucketing: 0 abnormal is Low, up to the medium bound is
/// Medium, anything more is High. Report size is irrelevant.
pub fn risk_tier(abnormal_count: usize, thresholds: &ScoringThresholds) -> RiskTier {
    if abnormal_count == 0 {
        RiskTier::Low
    } else if abnormal_count <= thresholds.medium_risk_max_abnormal {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

pub fn headline(health_score: u8, thresholds: &ScoringThresholds) -> HealthHeadline {
    if health_score >= thresholds.excellent_min_score {
        HealthHeadline::Excellent
    } else if health_score >= thresholds.good_min_score {
        HealthHeadline::Good
    } else if health_score >= thresholds.needs_attention_min_score {
        HealthHeadline::NeedsAttention
    } else {
        HealthHeadline::RequiresAction
    }
}
