use crate::pipeline::services::segmentation::BandMasks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BandCounts {
    pub healthy: u64,
    pub diseased: u64,
}

impl BandCounts {
    /// Pixels in both bands count twice.
    pub fn leaf_area(&self) -> u64 {
        self.healthy + self.diseased
    }

    /// Diseased share of the leaf area in percent, `None` when no leaf was found.
    pub fn severity_ratio(&self) -> Option<f64> {
        let leaf_area = self.leaf_area();
        if leaf_area == 0 {
            return None;
        }
        Some(self.diseased as f64 / leaf_area as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn count(&self, masks: &BandMasks) -> BandCounts {
        BandCounts {
            healthy: masks.healthy.count_set(),
            diseased: masks.diseased.count_set(),
        }
    }
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
