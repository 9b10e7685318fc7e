use bytes::Bytes;
use std::fmt::Display;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::Service;
use tower_layer::Layer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::pipeline::types::AnalysisOutcome;

/// Gives every analysis a request id and logs its outcome inside that span.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpanLayer;

impl<S> Layer<S> for RequestSpanLayer {
    type Service = RequestSpan<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestSpan { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestSpan<S> {
    inner: S,
}

impl<S> Service<Bytes> for RequestSpan<S>
where
    S: Service<Bytes, Response = AnalysisOutcome>,
    S::Error: Display + 'static,
    S::Future: Send + 'static,
{
    type Response = AnalysisOutcome;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, upload: Bytes) -> Self::Future {
        let request_id = Uuid::new_v4();
        let span = info_span!("analysis", %request_id, upload_bytes = upload.len());
        let start = Instant::now();
        let future = span.in_scope(|| self.inner.call(upload));

        Box::pin(
            async move {
                let result = future.await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                match &result {
                    Ok(outcome) => info!(
                        severity = %outcome.level(),
                        percentage = outcome.percentage(),
                        elapsed_ms,
                        "Analysis complete"
                    ),
                    Err(e) => warn!(elapsed_ms, "Analysis failed: {}", e),
                }
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    #[tokio::test]
    async fn passes_response_through() {
        let inner = service_fn(|_upload: Bytes| async {
            Ok::<_, Infallible>(AnalysisOutcome::NoLeafDetected)
        });
        let service = RequestSpanLayer.layer(inner);
        let outcome = service.oneshot(Bytes::from_static(b"leaf")).await.unwrap();
        assert_eq!(outcome, AnalysisOutcome::NoLeafDetected);
    }

    #[tokio::test]
    async fn passes_error_through() {
        let inner = service_fn(|_upload: Bytes| async {
            Err::<AnalysisOutcome, _>("boom".to_string())
        });
        let service = RequestSpanLayer.layer(inner);
        let result = service.oneshot(Bytes::new()).await;
        assert_eq!(result.unwrap_err(), "boom");
    }
}
