use bytes::Bytes;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, ServiceBuilder};

use crate::config::AnalysisConfiguration;
use crate::pipeline::orchestration::{RequestSpanLayer, SeverityAnalyzer};
use crate::pipeline::services::SeverityService;
use crate::pipeline::types::AnalysisOutcome;

/// Shareable handle to the layered analysis service.
pub type AnalysisService = BoxCloneSyncService<Bytes, AnalysisOutcome, BoxError>;

/// request span → timeout → blocking analysis. The concurrency bound lives in
/// `SeverityService`, where it outlives a timed-out caller.
pub fn build_analysis_service(configuration: &AnalysisConfiguration) -> AnalysisService {
    let service = ServiceBuilder::new()
        .layer(RequestSpanLayer)
        .timeout(configuration.timeout())
        .service(SeverityService::new(
            SeverityAnalyzer::new(configuration),
            configuration.max_concurrent,
        ));

    BoxCloneSyncService::new(service)
}
