//! Presentation-side owner of the current report.
//!
//! The chat assistant and the comparison widget both need "the report on
//! screen". `ReportSession` holds it explicitly: callers pass the session to
//! whichever collaborator needs it instead of reading a shared global.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::analysis::{range_position, RangePosition, ReportAnalysis, ReportAnalyzer, ReportError};
use crate::analysis::DefaultReportAnalyzer;
use crate::models::{AnalyzeRequest, TestResult};

/// A successfully analyzed report and when it was analyzed.
#[derive(Debug, Clone)]
pub struct CurrentReport {
    pub id: Uuid,
    pub analyzed_at: NaiveDateTime,
    pub analysis: ReportAnalysis,
}

impl CurrentReport {
    /// "Analysis completed on ..." line shown above the summary.
    pub fn completed_label(&self) -> String {
        format!(
            "Analysis completed on {} at {}",
            self.analyzed_at.format("%Y-%m-%d"),
            self.analyzed_at.format("%H:%M:%S")
        )
    }
}

/// Single owner of the report currently being viewed.
pub struct ReportSession<A: ReportAnalyzer = DefaultReportAnalyzer> {
    analyzer: A,
    current: Option<CurrentReport>,
    comparison_index: usize,
}

impl Default for ReportSession<DefaultReportAnalyzer> {
    fn default() -> Self {
        Self::new(DefaultReportAnalyzer::default())
    }
}

impl<A: ReportAnalyzer> ReportSession<A> {
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            current: None,
            comparison_index: 0,
        }
    }

    /// Analyze a new submission and make it current.
    ///
    /// On failure the previous report stays current and untouched.
    pub fn submit(&mut self, request: &AnalyzeRequest) -> Result<&CurrentReport, ReportError> {
        let analysis = self.analyzer.analyze_request(request)?;
        let id = Uuid::new_v4();

        tracing::info!(session_report = %id, tests = analysis.report.len(), "Report is now current");

        self.comparison_index = 0;
        Ok(&*self.current.insert(CurrentReport {
            id,
            analyzed_at: chrono::Local::now().naive_local(),
            analysis,
        }))
    }

    pub fn current(&self) -> Option<&CurrentReport> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.comparison_index = 0;
    }

    /// Greeting for the chat assistant once a report is loaded.
    pub fn welcome_message(&self) -> Option<String> {
        self.current.as_ref().map(|c| {
            format!(
                "Great! I've analyzed your medical report with {} tests. \
                 Feel free to ask me any questions about your results!",
                c.analysis.report.len()
            )
        })
    }

    /// Question pre-filled into the chat when the user taps "Learn More" on a
    /// result. `None` if no report is loaded or the test is not in it.
    pub fn follow_up_question(&self, test: &str) -> Option<String> {
        let result = self.current.as_ref()?.analysis.report.find(test)?;
        Some(format!(
            "Why is my {} {}?",
            result.test,
            result.status.as_str().to_lowercase()
        ))
    }

    /// Select the result shown in the comparison widget. Out-of-range indexes
    /// leave the selection unchanged.
    pub fn select_comparison(&mut self, index: usize) -> Option<&TestResult> {
        let len = self.current.as_ref()?.analysis.report.len();
        if index < len {
            self.comparison_index = index;
        }
        self.comparison()
    }

    pub fn comparison(&self) -> Option<&TestResult> {
        self.current
            .as_ref()?
            .analysis
            .report
            .results()
            .get(self.comparison_index)
    }

    /// Marker placement for the selected comparison result.
    pub fn comparison_position(&self) -> Option<RangePosition> {
        self.comparison().and_then(range_position)
    }
}
