pub mod analysis; // Scoring, deviation, insights, triage
pub mod config;
pub mod models;
pub mod recommend; // Rule-based specialist referrals
pub mod session; // Single owner of the report on screen

pub use analysis::{DefaultReportAnalyzer, ReportAnalysis, ReportAnalyzer, ReportError};
pub use config::EngineConfig;
pub use session::ReportSession;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for hosts that have none.
///
/// `RUST_LOG` wins; otherwise `config::default_log_filter()` applies. A host
/// that already installed its own subscriber keeps it.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} engine v{}", config::APP_NAME, config::APP_VERSION);
    }
}
