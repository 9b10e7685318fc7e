pub mod analysis_stack;
pub mod analyzer;
pub mod request_span;
pub mod stage_timings;

pub use analysis_stack::{build_analysis_service, AnalysisService};
pub use analyzer::SeverityAnalyzer;
pub use request_span::{RequestSpan, RequestSpanLayer};
pub use stage_timings::{AnalysisStage, StageTimings};
