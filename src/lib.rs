pub mod config;
pub mod error;
pub mod network;
pub mod pipeline;

pub use config::Configuration;
pub use error::{AnalysisError, AppError};

pub use network::Server;
pub use pipeline::{AnalysisOutcome, SeverityAnalyzer, SeverityLevel, SeverityResult};
