use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeverityLevel {
    Unknown,
    Healthy,
    Low,
    Moderate,
    High,
    Critical,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Unknown => "Unknown",
            SeverityLevel::Healthy => "Healthy",
            SeverityLevel::Low => "Low",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::High => "High",
            SeverityLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one measured leaf. `percentage` is already rounded to two
/// decimals for reporting; `level` was chosen from the unrounded ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityResult {
    pub percentage: f64,
    pub level: SeverityLevel,
    pub diseased_pixel_count: u64,
    pub healthy_pixel_count: u64,
    pub total_leaf_pixel_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Measured(SeverityResult),
    /// Decoding worked but no pixel fell in either color band.
    NoLeafDetected,
}

impl AnalysisOutcome {
    pub fn level(&self) -> SeverityLevel {
        match self {
            AnalysisOutcome::Measured(result) => result.level,
            AnalysisOutcome::NoLeafDetected => SeverityLevel::Unknown,
        }
    }

    pub fn percentage(&self) -> f64 {
        match self {
            AnalysisOutcome::Measured(result) => result.percentage,
            AnalysisOutcome::NoLeafDetected => 0.0,
        }
    }
}
