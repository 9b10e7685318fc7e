use serde::Serialize;

use crate::error::AnalysisError;
use crate::pipeline::{AnalysisOutcome, SeverityLevel};

pub const METHOD: &str = "HSV Color Segmentation Algorithm";
pub const NO_LEAF_MESSAGE: &str = "No leaf detected";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityDetails {
    pub green_pixels: u64,
    pub diseased_pixels: u64,
    pub total_leaf_pixels: u64,
}

/// JSON body of `POST /analyze-severity`. Exactly one shape per outcome; the
/// error shape never carries numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeverityResponse {
    Measured {
        severity_percentage: f64,
        severity_level: SeverityLevel,
        details: SeverityDetails,
        method: &'static str,
    },
    NoLeaf {
        severity_percentage: u32,
        severity_level: SeverityLevel,
        message: &'static str,
    },
    Error {
        error: String,
    },
}

impl SeverityResponse {
    pub fn error(message: impl Into<String>) -> Self {
        SeverityResponse::Error {
            error: message.into(),
        }
    }
}

impl From<AnalysisOutcome> for SeverityResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Measured(result) => SeverityResponse::Measured {
                severity_percentage: result.percentage,
                severity_level: result.level,
                details: SeverityDetails {
                    green_pixels: result.healthy_pixel_count,
                    diseased_pixels: result.diseased_pixel_count,
                    total_leaf_pixels: result.total_leaf_pixel_count,
                },
                method: METHOD,
            },
            AnalysisOutcome::NoLeafDetected => SeverityResponse::NoLeaf {
                severity_percentage: 0,
                severity_level: SeverityLevel::Unknown,
                message: NO_LEAF_MESSAGE,
            },
        }
    }
}

impl From<AnalysisError> for SeverityResponse {
    fn from(error: AnalysisError) -> Self {
        SeverityResponse::error(error.to_string())
    }
}

impl From<Result<AnalysisOutcome, AnalysisError>> for SeverityResponse {
    fn from(result: Result<AnalysisOutcome, AnalysisError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(error) => error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SeverityResult;
    use serde_json::json;

    #[test]
    fn measured_shape() {
        let response = SeverityResponse::from(AnalysisOutcome::Measured(SeverityResult {
            percentage: 12.5,
            level: SeverityLevel::Moderate,
            diseased_pixel_count: 10,
            healthy_pixel_count: 70,
            total_leaf_pixel_count: 80,
        }));
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "severity_percentage": 12.5,
                "severity_level": "Moderate",
                "details": {
                    "green_pixels": 70,
                    "diseased_pixels": 10,
                    "total_leaf_pixels": 80
                },
                "method": "HSV Color Segmentation Algorithm"
            })
        );
    }

    #[test]
    fn no_leaf_shape() {
        let response = SeverityResponse::from(AnalysisOutcome::NoLeafDetected);
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "severity_percentage": 0,
                "severity_level": "Unknown",
                "message": "No leaf detected"
            })
        );
    }

    #[test]
    fn error_shape_has_only_error_field() {
        let response = SeverityResponse::from(AnalysisError::Decode("bad magic".to_string()));
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "error": "Invalid image format" })
        );
    }
}
