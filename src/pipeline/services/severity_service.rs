use bytes::Bytes;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::sync::Semaphore;
use tower::timeout::error::Elapsed;
use tower::{BoxError, Service};
use tracing::error;

use crate::error::AnalysisError;
use crate::pipeline::orchestration::SeverityAnalyzer;
use crate::pipeline::types::AnalysisOutcome;

/// Runs each analysis to completion on the blocking pool. A panic in the
/// worker surfaces as `AnalysisError::Unexpected`, never as a crash.
///
/// At most `max_concurrent` analyses run at once. The slot travels with the
/// blocking job, so a caller that gives up (timeout, dropped connection) does
/// not free it before the CPU work is actually done.
#[derive(Clone)]
pub struct SeverityService {
    analyzer: Arc<SeverityAnalyzer>,
    permits: Arc<Semaphore>,
}

impl SeverityService {
    pub fn new(analyzer: SeverityAnalyzer, max_concurrent: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    #[cfg(test)]
    pub(crate) fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Service<Bytes> for SeverityService {
    type Response = AnalysisOutcome;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, upload: Bytes) -> Self::Future {
        let analyzer = self.analyzer.clone();
        let permits = self.permits.clone();

        Box::pin(async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|e| AnalysisError::Unexpected(e.to_string()))?;

            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                analyzer.analyze(&upload)
            })
            .await
            .map_err(|e| {
                error!("Analysis worker failed: {}", e);
                if e.is_panic() {
                    AnalysisError::Unexpected("analysis worker panicked".to_string())
                } else {
                    AnalysisError::Unexpected("analysis worker was cancelled".to_string())
                }
            })?
        })
    }
}

/// Recovers the typed failure from a layered service error.
pub fn into_analysis_error(error: BoxError) -> AnalysisError {
    if error.is::<Elapsed>() {
        return AnalysisError::Unexpected("analysis timed out".to_string());
    }
    match error.downcast::<AnalysisError>() {
        Ok(analysis_error) => *analysis_error,
        Err(other) => AnalysisError::Unexpected(other.to_string()),
    }
}
