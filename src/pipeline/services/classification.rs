use crate::pipeline::types::SeverityLevel;

const CRITICAL_ABOVE: f64 = 50.0;
const HIGH_ABOVE: f64 = 20.0;
const MODERATE_ABOVE: f64 = 5.0;

/// Maps a severity ratio (percent) to a level. Every breakpoint is an
/// exclusive lower bound: exactly 50 is High, not Critical.
pub fn classify(ratio: f64) -> SeverityLevel {
    if ratio > CRITICAL_ABOVE {
        SeverityLevel::Critical
    } else if ratio > HIGH_ABOVE {
        SeverityLevel::High
    } else if ratio > MODERATE_ABOVE {
        SeverityLevel::Moderate
    } else if ratio > 0.0 {
        SeverityLevel::Low
    } else {
        SeverityLevel::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_fall_into_lower_band() {
        assert_eq!(classify(50.0), SeverityLevel::High);
        assert_eq!(classify(20.0), SeverityLevel::Moderate);
        assert_eq!(classify(5.0), SeverityLevel::Low);
        assert_eq!(classify(0.0), SeverityLevel::Healthy);
    }

    #[test]
    fn just_above_breakpoints_moves_up() {
        assert_eq!(classify(50.0001), SeverityLevel::Critical);
        assert_eq!(classify(20.0001), SeverityLevel::High);
        assert_eq!(classify(5.0001), SeverityLevel::Moderate);
        assert_eq!(classify(0.0001), SeverityLevel::Low);
    }

    #[test]
    fn extremes() {
        assert_eq!(classify(100.0), SeverityLevel::Critical);
        assert_eq!(classify(12.5), SeverityLevel::Moderate);
        assert_eq!(classify(33.0), SeverityLevel::High);
    }
}
