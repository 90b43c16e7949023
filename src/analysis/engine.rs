use std::time::Instant;

use crate::config::EngineConfig;
use crate::models::{RawRecommendations, RawTestResult, TestExplanation};

use super::deviation::{attention_tests, critical_tests_with};
use super::insights::{insights, test_insights};
use super::scoring::score_with;
use super::triage::triage;
use super::types::{ReportAnalysis, ReportAnalyzer, ReportError};
use super::validation::validate_with;

/// Default implementation of the report analyzer.
/// Validates once, then derives every output from that single `Report`.
#[derive(Debug, Clone, Default)]
pub struct DefaultReportAnalyzer {
    pub(crate) config: EngineConfig,
}

impl DefaultReportAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl ReportAnalyzer for DefaultReportAnalyzer {
    fn analyze(
        &self,
        results: &[RawTestResult],
        recommendations: Option<&RawRecommendations>,
        explanations: &[TestExplanation],
    ) -> Result<ReportAnalysis, ReportError> {
        let start = Instant::now();

        let report = validate_with(results, &self.config).map_err(|e| {
            tracing::warn!(error = %e, "Report rejected");
            e
        })?;
        // Triage validates its own input, so run it before building anything else.
        let triage = triage(&report, recommendations)?;

        let summary = score_with(&report, &self.config.thresholds);
        let critical_tests = critical_tests_with(&report, self.config.critical_deviation);
        let insights = insights(&report, &summary, &critical_tests);
        let attention_tests = attention_tests(&report);
        let test_insights = test_insights(&report, explanations);

        tracing::info!(
            total = summary.total_count,
            abnormal = summary.abnormal_count(),
            critical = critical_tests.len(),
            health_score = summary.health_score,
            risk = %summary.risk_tier,
            urgency = %triage.urgency,
            processing_us = start.elapsed().as_micros() as u64,
            "Report analysis complete"
        );

        Ok(ReportAnalysis {
            report,
            summary,
            insights,
            critical_tests,
            attention_tests,
            test_insights,
            triage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyzeRequest, HealthHeadline, RiskTier, Urgency};

    fn raw(test: &str, value: f64, min: f64, max: f64, status: &str) -> RawTestResult {
        RawTestResult {
            test: test.into(),
            value,
            min,
            max,
            unit: String::new(),
            status: status.into(),
        }
    }

    #[test]
    fn single_normal_glucose() {
        let analyzer = DefaultReportAnalyzer::default();
        let analysis = analyzer
            .analyze(&[raw("Glucose", 95.0, 70.0, 100.0, "Normal")], None, &[])
            .unwrap();

        assert_eq!(analysis.summary.health_score, 100);
        assert_eq!(analysis.summary.risk_tier, RiskTier::Low);
        assert_eq!(analysis.insights.len(), 2);
        assert_eq!(analysis.insights[0].text, "1 test within normal range.");
        assert!(analysis.insights[1].text.starts_with("All tests are normal"));
        assert!(analysis.critical_tests.is_empty());
        assert!(analysis.attention_tests.is_empty());
    }

    #[test]
    fn lipid_panel_all_abnormal() {
        let analyzer = DefaultReportAnalyzer::default();
        let analysis = analyzer
            .analyze(
                &[
                    raw("LDL", 200.0, 0.0, 130.0, "High"),
                    raw("HDL", 30.0, 40.0, 90.0, "Low"),
                ],
                None,
                &[],
            )
            .unwrap();

        assert_eq!(analysis.summary.normal_count, 0);
        assert_eq!(analysis.summary.health_score, 0);
        assert_eq!(analysis.summary.abnormal_count(), 2);
        assert_eq!(analysis.summary.risk_tier, RiskTier::Medium);
    }

    #[test]
    fn ten_results_three_abnormal_keeps_divergent_tiers() {
        let mut results: Vec<RawTestResult> = (0..7)
            .map(|i| raw(&format!("Normal{i}"), 5.0, 0.0, 10.0, "Normal"))
            .collect();
        results.push(raw("LDL", 200.0, 0.0, 130.0, "High"));
        results.push(raw("HDL", 30.0, 40.0, 90.0, "Low"));
        results.push(raw("Glucose", 130.0, 70.0, 100.0, "High"));

        let analysis = DefaultReportAnalyzer::default()
            .analyze(&results, None, &[])
            .unwrap();
        assert_eq!(analysis.summary.health_score, 70);
        assert_eq!(analysis.summary.headline, HealthHeadline::Good);
        assert_eq!(analysis.summary.risk_tier, RiskTier::High);
    }

    #[test]
    fn degenerate_range_produces_nothing() {
        let result = DefaultReportAnalyzer::default().analyze(
            &[
                raw("Glucose", 95.0, 70.0, 100.0, "Normal"),
                raw("Sodium", 140.0, 140.0, 140.0, "Normal"),
            ],
            None,
            &[],
        );
        assert!(matches!(result, Err(ReportError::DegenerateRange { .. })));
    }

    #[test]
    fn empty_report_rejected() {
        let result = DefaultReportAnalyzer::default().analyze(&[], None, &[]);
        assert_eq!(result.unwrap_err(), ReportError::EmptyReport);
    }

    #[test]
    fn bad_urgency_rejects_whole_analysis() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{
                "results": [{"test":"Glucose","value":95,"min":70,"max":100,"status":"Normal"}],
                "doctor_recommendations": {"urgency": "whenever"}
            }"#,
        )
        .unwrap();
        let result = DefaultReportAnalyzer::default().analyze_request(&request);
        assert_eq!(
            result.unwrap_err(),
            ReportError::InvalidUrgency("whenever".into())
        );
    }

    #[test]
    fn request_round_trip_through_analyzer() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{
                "results": [
                    {"test":"Troponin","value":0.5,"min":0,"max":0.04,"unit":"ng/mL","status":"High"},
                    {"test":"Glucose","value":95,"min":70,"max":100,"unit":"mg/dL","status":"Normal"}
                ],
                "doctor_recommendations": {
                    "urgency": "emergency",
                    "reasons": ["Possible heart attack - EMERGENCY"],
                    "specialists": [{"name":"Cardiologist","priority":"Low","reason_count":1}]
                },
                "insights": [{"test":"Troponin","insight":"Troponin is elevated."}]
            }"#,
        )
        .unwrap();
        let analysis = DefaultReportAnalyzer::default()
            .analyze_request(&request)
            .unwrap();

        assert_eq!(analysis.triage.urgency, Urgency::Emergency);
        assert_eq!(analysis.critical_tests.len(), 1);
        assert_eq!(analysis.summary.health_score, 50);
        assert_eq!(
            analysis.test_insights[0].explanation.as_deref(),
            Some("Troponin is elevated.")
        );
        assert_eq!(analysis.report.len(), 2);
    }

    #[test]
    fn analysis_is_deterministic() {
        let results = [
            raw("LDL", 200.0, 0.0, 130.0, "High"),
            raw("Glucose", 95.0, 70.0, 100.0, "Normal"),
        ];
        let analyzer = DefaultReportAnalyzer::default();
        let first = analyzer.analyze(&results, None, &[]).unwrap();
        let second = analyzer.analyze(&results, None, &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn custom_threshold_changes_critical_set() {
        let config = EngineConfig {
            critical_deviation: 2.0,
            ..EngineConfig::default()
        };
        let analysis = DefaultReportAnalyzer::new(config)
            .analyze(
                &[
                    raw("LDL", 200.0, 0.0, 130.0, "High"),
                    raw("HDL", 30.0, 40.0, 90.0, "Low"),
                ],
                None,
                &[],
            )
            .unwrap();
        // LDL deviation ~2.08, HDL 1.4
        assert_eq!(analysis.critical_tests.len(), 1);
        assert_eq!(analysis.critical_tests[0].test, "LDL");
    }
}
