pub mod orchestration;
pub mod services;
pub mod types;

pub use orchestration::{build_analysis_service, AnalysisService, SeverityAnalyzer};
pub use types::{AnalysisOutcome, SeverityLevel, SeverityResult};
