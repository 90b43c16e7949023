use serde::{Deserialize, Serialize};

use super::enums::TestStatus;

/// One lab result exactly as the extraction service delivers it.
/// `status` stays a string until validation so unknown values can be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTestResult {
    pub test: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub unit: String,
    pub status: String,
}

/// A validated lab result. Guaranteed `min < max` with finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub status: TestStatus,
}

impl TestResult {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_range(&self) -> f64 {
        (self.max - self.min) / 2.0
    }
}

/// Ordered, non-empty set of validated results.
///
/// Only `analysis::validate` builds one, so every downstream stage can rely on
/// the range and status invariants without re-checking them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report(Vec<TestResult>);

impl Report {
    pub(crate) fn from_validated(results: Vec<TestResult>) -> Self {
        Self(results)
    }

    pub fn results(&self) -> &[TestResult] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a validated report; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First result with the given name. Duplicates are kept in order, so
    /// later entries with the same name are reachable through `iter`.
    pub fn find(&self, test: &str) -> Option<&TestResult> {
        self.0.iter().find(|r| r.test == test)
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a TestResult;
    type IntoIter = std::slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
