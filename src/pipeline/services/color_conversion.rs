use image::Rgb;

use crate::pipeline::types::{Hsv, HsvGrid, PixelGrid};

/// 8-bit RGB to HSV with hue halved onto 0..=179 so it fits a byte; pure green
/// lands on 60, yellows and browns below 30.
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> Hsv {
    let [r, g, b] = pixel.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    let degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g as f32 - b as f32) / delta
    } else if max == g {
        120.0 + 60.0 * (b as f32 - r as f32) / delta
    } else {
        240.0 + 60.0 * (r as f32 - g as f32) / delta
    };
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

    let h = (degrees / 2.0).round() as u16 % 180;

    Hsv::new(h as u8, s, max)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorSpaceConverter;

impl ColorSpaceConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, grid: &PixelGrid) -> HsvGrid {
        let (width, height) = grid.dimensions();
        let pixels = grid.pixels().map(rgb_to_hsv).collect();
        HsvGrid::new(width, height, pixels)
    }
}
