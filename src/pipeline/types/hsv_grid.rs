use image::RgbImage;

/// Decoded RGB pixels, three 8-bit channels per pixel.
pub type PixelGrid = RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    /// 0..=179, half-degree steps around the color wheel.
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// HSV counterpart of a `PixelGrid`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvGrid {
    width: u32,
    height: u32,
    pixels: Vec<Hsv>,
}

impl HsvGrid {
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<Hsv>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Hsv>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_pixel(width: u32, height: u32, pixel: Hsv) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Hsv] {
        &self.pixels
    }

    #[cfg(test)]
    pub(crate) fn get(&self, x: u32, y: u32) -> Option<Hsv> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}
