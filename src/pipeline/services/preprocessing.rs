use image::imageops::{self, FilterType};
use tracing::debug;

use crate::pipeline::types::PixelGrid;

/// Normalizes every grid to one size so mask dimensions and pixel counts are
/// comparable between uploads.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    width: u32,
    height: u32,
}

impl Preprocessor {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn resize(&self, grid: PixelGrid) -> PixelGrid {
        if grid.dimensions() == (self.width, self.height) {
            return grid;
        }
        debug!(
            "Resizing {:?} to {}x{}",
            grid.dimensions(),
            self.width,
            self.height
        );
        // Bilinear, like the usual linear interpolation default.
        imageops::resize(&grid, self.width, self.height, FilterType::Triangle)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(500, 500)
    }
}
