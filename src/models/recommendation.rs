use serde::{Deserialize, Serialize};

use super::lab::RawTestResult;

/// Specialist entry of a `doctor_recommendations` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpecialist {
    pub name: String,
    pub priority: String,
    #[serde(default)]
    pub reason_count: u32,
}

/// `doctor_recommendations` payload from the recommendation source.
/// Urgency and priorities are validated by `analysis::triage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecommendations {
    pub urgency: String,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub specialists: Vec<RawSpecialist>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// Free-text explanation for one test, authored by the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestExplanation {
    pub test: String,
    pub insight: String,
}

/// Full analysis request as posted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub results: Vec<RawTestResult>,
    #[serde(default)]
    pub doctor_recommendations: Option<RawRecommendations>,
    #[serde(default)]
    pub insights: Vec<TestExplanation>,
}
