pub mod aggregation;
pub mod classification;
pub mod color_conversion;
pub mod decoding;
pub mod preprocessing;
pub mod segmentation;
pub mod severity_service;

pub use aggregation::{round_to_hundredths, Aggregator, BandCounts};
pub use classification::classify;
pub use color_conversion::{rgb_to_hsv, ColorSpaceConverter};
pub use decoding::ImageDecoder;
pub use preprocessing::Preprocessor;
pub use segmentation::{
    BandMasks, BandSegmenter, BoundaryPolicy, ColorRange, DISEASED_RANGE, DISJOINT_HEALTHY_RANGE,
    HEALTHY_RANGE,
};
pub use severity_service::{into_analysis_error, SeverityService};
