use indexmap::IndexMap;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    Decode,
    Preprocess,
    ColorConversion,
    Segmentation,
    Aggregation,
    Classification,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Decode => "decode",
            AnalysisStage::Preprocess => "preprocess",
            AnalysisStage::ColorConversion => "color_conversion",
            AnalysisStage::Segmentation => "segmentation",
            AnalysisStage::Aggregation => "aggregation",
            AnalysisStage::Classification => "classification",
        };
        f.write_str(name)
    }
}

/// Wall-clock time spent in each stage of one analysis, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    stage_durations: IndexMap<AnalysisStage, Duration>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` and add its duration to `stage`
    pub fn measure<T>(&mut self, stage: AnalysisStage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let output = f();
        self.record(stage, start.elapsed());
        output
    }

    pub fn record(&mut self, stage: AnalysisStage, duration: Duration) {
        *self.stage_durations.entry(stage).or_default() += duration;
    }

    pub fn get_stage_duration(&self, stage: AnalysisStage) -> Duration {
        self.stage_durations
            .get(&stage)
            .copied()
            .unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.stage_durations.values().sum()
    }

    pub fn stages(&self) -> impl Iterator<Item = (&AnalysisStage, &Duration)> {
        self.stage_durations.iter()
    }

    pub fn summary(&self) -> String {
        self.stages()
            .map(|(stage, duration)| format!("{}={}us", stage, duration.as_micros()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
