//! Report scoring and triage.
//!
//! Every function here is pure: results go in, immutable values come out.
//! `validate` is the only way to obtain a `Report`, so the scoring, deviation,
//! insight and triage stages never see unchecked input.

pub mod deviation;
pub mod engine;
pub mod insights;
pub mod scoring;
pub mod triage;
pub mod types;
pub mod validation;

pub use deviation::{attention_tests, critical_tests, deviation, range_position};
pub use engine::DefaultReportAnalyzer;
pub use insights::{insights, test_insights};
pub use scoring::score;
pub use triage::triage;
pub use types::*;
pub use validation::validate;
