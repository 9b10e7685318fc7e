mod hsv_grid;
mod mask;
mod severity;

pub use hsv_grid::{Hsv, HsvGrid, PixelGrid};
pub use mask::Mask;
pub use severity::{AnalysisOutcome, SeverityLevel, SeverityResult};
