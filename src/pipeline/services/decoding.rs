use std::io::Cursor;

use image::{ImageError, ImageReader, Limits};
use tracing::debug;

use crate::error::AnalysisError;
use crate::pipeline::types::PixelGrid;

// Worst case decoder buffer per pixel: four 16-bit channels.
const MAX_BYTES_PER_PIXEL: u64 = 8;

// Upper bound on pixels any supported codec can encode per payload byte
// (deflate at 1 bit per pixel, BMP RLE skips). A header claiming more is
// corrupt, not large.
const MAX_PIXELS_PER_ENCODED_BYTE: u64 = 65_536;

/// Turns an encoded upload into RGB pixels. The format is sniffed from the
/// leading bytes, never from a file name.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    max_image_pixels: u64,
}

impl ImageDecoder {
    pub fn new(max_image_pixels: u64) -> Self {
        Self { max_image_pixels }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<PixelGrid, AnalysisError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AnalysisError::Decode(e.to_string()))?;

        let format = reader
            .format()
            .ok_or_else(|| AnalysisError::Decode("unrecognized image format".to_string()))?;
        debug!("Sniffed image format: {:?}", format);

        let mut limits = Limits::default();
        limits.max_alloc = Some(self.max_image_pixels.saturating_mul(MAX_BYTES_PER_PIXEL));
        reader.limits(limits);

        let image = reader.decode().map_err(|e| match e {
            ImageError::Limits(limit) if Self::declares_plausible_size(bytes) => {
                AnalysisError::Unexpected(format!("image exceeds decoder limits: {limit}"))
            }
            other => AnalysisError::Decode(other.to_string()),
        })?;

        // Alpha is dropped, not composited.
        Ok(image.to_rgb8())
    }

    /// Whether the header dimensions could actually be carried by a payload of
    /// this length. Only then is a limit violation a genuinely large image.
    fn declares_plausible_size(bytes: &[u8]) -> bool {
        let dimensions = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());

        match dimensions {
            Some((width, height)) => {
                let declared = u64::from(width) * u64::from(height);
                declared <= (bytes.len() as u64).saturating_mul(MAX_PIXELS_PER_ENCODED_BYTE)
            }
            None => false,
        }
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new(64_000_000)
    }
}
