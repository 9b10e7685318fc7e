use serde::Deserialize;

use crate::pipeline::types::{Hsv, HsvGrid, Mask};

/// Inclusive lower/upper bound per HSV channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ColorRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, pixel: Hsv) -> bool {
        pixel.h >= self.lower.h
            && pixel.h <= self.upper.h
            && pixel.s >= self.lower.s
            && pixel.s <= self.upper.s
            && pixel.v >= self.lower.v
            && pixel.v <= self.upper.v
    }
}

/// Green leaf tissue.
pub const HEALTHY_RANGE: ColorRange = ColorRange::new(Hsv::new(30, 40, 40), Hsv::new(90, 255, 255));

/// Yellow to brown lesions.
pub const DISEASED_RANGE: ColorRange =
    ColorRange::new(Hsv::new(10, 40, 40), Hsv::new(30, 255, 255));

/// Healthy band with hue 30 handed to the diseased band alone.
pub const DISJOINT_HEALTHY_RANGE: ColorRange =
    ColorRange::new(Hsv::new(31, 40, 40), Hsv::new(90, 255, 255));

/// What happens to a pixel whose hue is exactly 30, the value both bands share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Counted in both masks, and therefore twice toward leaf area.
    #[default]
    Overlapping,
    /// Counted as diseased only.
    Disjoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandMasks {
    pub healthy: Mask,
    pub diseased: Mask,
}

#[derive(Debug, Clone, Copy)]
pub struct BandSegmenter {
    healthy: ColorRange,
    diseased: ColorRange,
}

impl BandSegmenter {
    pub fn new(policy: BoundaryPolicy) -> Self {
        let healthy = match policy {
            BoundaryPolicy::Overlapping => HEALTHY_RANGE,
            BoundaryPolicy::Disjoint => DISJOINT_HEALTHY_RANGE,
        };
        Self {
            healthy,
            diseased: DISEASED_RANGE,
        }
    }

    pub fn segment(&self, grid: &HsvGrid) -> BandMasks {
        BandMasks {
            healthy: Self::threshold(grid, &self.healthy),
            diseased: Self::threshold(grid, &self.diseased),
        }
    }

    fn threshold(grid: &HsvGrid, range: &ColorRange) -> Mask {
        let (width, height) = grid.dimensions();
        let bits = grid.pixels().iter().map(|&p| range.contains(p)).collect();
        Mask::new(width, height, bits)
    }
}

impl Default for BandSegmenter {
    fn default() -> Self {
        Self::new(BoundaryPolicy::default())
    }
}
