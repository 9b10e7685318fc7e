use tracing::debug;

use crate::config::AnalysisConfiguration;
use crate::error::AnalysisError;
use crate::pipeline::orchestration::stage_timings::{AnalysisStage, StageTimings};
use crate::pipeline::services::{
    classify, round_to_hundredths, Aggregator, BandSegmenter, ColorSpaceConverter, ImageDecoder,
    Preprocessor,
};
use crate::pipeline::types::{AnalysisOutcome, PixelGrid, SeverityResult};

/// Runs decode → resize → HSV → band masks → counts → level on one upload.
/// Holds only immutable settings, so one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct SeverityAnalyzer {
    decoder: ImageDecoder,
    preprocessor: Preprocessor,
    converter: ColorSpaceConverter,
    segmenter: BandSegmenter,
    aggregator: Aggregator,
}

impl SeverityAnalyzer {
    pub fn new(configuration: &AnalysisConfiguration) -> Self {
        let (width, height) = configuration.target_dimensions();
        Self {
            decoder: ImageDecoder::new(configuration.max_image_pixels),
            preprocessor: Preprocessor::new(width, height),
            converter: ColorSpaceConverter::new(),
            segmenter: BandSegmenter::new(configuration.boundary_policy),
            aggregator: Aggregator::new(),
        }
    }

    pub fn analyze(&self, bytes: &[u8]) -> Result<AnalysisOutcome, AnalysisError> {
        let mut timings = StageTimings::new();
        let grid = timings.measure(AnalysisStage::Decode, || self.decoder.decode(bytes))?;
        let outcome = self.analyze_grid_timed(grid, &mut timings);
        debug!(
            "Analysis finished in {}us: {}",
            timings.total().as_micros(),
            timings.summary()
        );
        Ok(outcome)
    }

    /// Same as `analyze` for an already decoded grid.
    pub fn analyze_grid(&self, grid: PixelGrid) -> AnalysisOutcome {
        self.analyze_grid_timed(grid, &mut StageTimings::new())
    }

    fn analyze_grid_timed(&self, grid: PixelGrid, timings: &mut StageTimings) -> AnalysisOutcome {
        let grid = timings.measure(AnalysisStage::Preprocess, || self.preprocessor.resize(grid));
        let hsv = timings.measure(AnalysisStage::ColorConversion, || {
            self.converter.convert(&grid)
        });
        let masks = timings.measure(AnalysisStage::Segmentation, || self.segmenter.segment(&hsv));
        let counts = timings.measure(AnalysisStage::Aggregation, || self.aggregator.count(&masks));

        let Some(ratio) = counts.severity_ratio() else {
            debug!("No pixel matched either color band");
            return AnalysisOutcome::NoLeafDetected;
        };

        let level = timings.measure(AnalysisStage::Classification, || classify(ratio));
        AnalysisOutcome::Measured(SeverityResult {
            percentage: round_to_hundredths(ratio),
            level,
            diseased_pixel_count: counts.diseased,
            healthy_pixel_count: counts.healthy,
            total_leaf_pixel_count: counts.leaf_area(),
        })
    }
}

impl Default for SeverityAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfiguration::default())
    }
}
