use serde::Serialize;
use thiserror::Error;

use crate::models::{
    AnalyzeRequest, HealthHeadline, InsightKind, RawRecommendations, RawTestResult, Report,
    RiskTier, SpecialistPriority, TestExplanation, TestResult, TestStatus, Urgency,
};

// ---------------------------------------------------------------------------
// ReportError
// ---------------------------------------------------------------------------

/// Input validation failures. Raised before any derived value is computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Report contains no test results")]
    EmptyReport,

    #[error("Degenerate reference range for {test}: min {min} is not below max {max}")]
    DegenerateRange { test: String, min: f64, max: f64 },

    #[error("Invalid status for {test}: {value}")]
    InvalidStatus { test: String, value: String },

    #[error("Invalid urgency: {0}")]
    InvalidUrgency(String),

    #[error("Invalid priority for specialist {specialist}: {value}")]
    InvalidPriority { specialist: String, value: String },

    #[error("Test result at position {index} has an empty name")]
    EmptyTestName { index: usize },

    #[error("Non-finite {field} for {test}")]
    NonFiniteValue { test: String, field: &'static str },
}

// ---------------------------------------------------------------------------
// ScoreSummary
// ---------------------------------------------------------------------------

/// Counts, score and tiers for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub normal_count: usize,
    pub high_count: usize,
    pub low_count: usize,
    pub total_count: usize,
    /// 0–100, round-half-up of the normal ratio.
    pub health_score: u8,
    pub risk_tier: RiskTier,
    /// Headline tier from `health_score`. Independent of `risk_tier`; the two
    /// may disagree.
    pub headline: HealthHeadline,
}

impl ScoreSummary {
    pub fn abnormal_count(&self) -> usize {
        self.high_count + self.low_count
    }

    pub fn normal_percent(&self) -> u8 {
        super::scoring::rounded_percent(self.normal_count, self.total_count)
    }

    pub fn high_percent(&self) -> u8 {
        super::scoring::rounded_percent(self.high_count, self.total_count)
    }

    pub fn low_percent(&self) -> u8 {
        super::scoring::rounded_percent(self.low_count, self.total_count)
    }

    /// Fraction of the score circle to fill. Derived from the rounded
    /// `health_score` so the arc always agrees with the printed number.
    pub fn arc_fill(&self) -> f64 {
        f64::from(self.health_score) / 100.0
    }
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// One quick-insight line. List order is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub icon: String,
    pub text: String,
}

/// Detail card for a single test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestInsight {
    pub test: String,
    pub status: TestStatus,
    pub icon: String,
    /// Supplied by the extraction service; never authored here.
    pub explanation: Option<String>,
}

/// Where a value sits on the comparison bar, as percentages of `max * 1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangePosition {
    pub normal_start: f64,
    pub normal_end: f64,
    /// Clamped to 0–100.
    pub marker: f64,
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specialist {
    pub name: String,
    pub priority: SpecialistPriority,
    pub reason_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageDecision {
    pub urgency: Urgency,
    pub reasons: Vec<String>,
    /// High priority first, then Medium, then Low; supplied order within a band.
    pub specialists: Vec<Specialist>,
    pub next_steps: Vec<String>,
}

impl TriageDecision {
    pub fn guidance(&self) -> &'static str {
        self.urgency.guidance()
    }

    pub fn reasons_display(&self, separator: &str) -> String {
        self.reasons.join(separator)
    }
}

// ---------------------------------------------------------------------------
// ReportAnalysis
// ---------------------------------------------------------------------------

/// Everything derived from one validated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAnalysis {
    pub report: Report,
    pub summary: ScoreSummary,
    pub insights: Vec<Insight>,
    pub critical_tests: Vec<TestResult>,
    pub attention_tests: Vec<TestResult>,
    pub test_insights: Vec<TestInsight>,
    pub triage: TriageDecision,
}

// ---------------------------------------------------------------------------
// ReportAnalyzer trait
// ---------------------------------------------------------------------------

/// Turns raw results into a `ReportAnalysis`, all or nothing.
pub trait ReportAnalyzer {
    fn analyze(
        &self,
        results: &[RawTestResult],
        recommendations: Option<&RawRecommendations>,
        explanations: &[TestExplanation],
    ) -> Result<ReportAnalysis, ReportError>;

    fn analyze_request(&self, request: &AnalyzeRequest) -> Result<ReportAnalysis, ReportError> {
        self.analyze(
            &request.results,
            request.doctor_recommendations.as_ref(),
            &request.insights,
        )
    }
}
