use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to bind to {1}: {0}")]
    Bind(std::io::Error, String),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// Per-request analysis failure. A leaf-free image is not an error, see
// `AnalysisOutcome::NoLeafDetected`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Invalid image format")]
    Decode(String),
    #[error("{0}")]
    Unexpected(String),
}
