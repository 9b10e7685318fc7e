use crate::{
    config::Configuration, error::AppError, network::router::app_router,
    pipeline::build_analysis_service,
};
use tokio::net::TcpListener;

use tracing::{info, warn};

pub struct Server {
    configuration: Configuration,
}

impl Server {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }

    pub async fn bind(&self) -> Result<TcpListener, AppError> {
        let address = self.configuration.server.bind_address();
        TcpListener::bind(&address)
            .await
            .map_err(|e| AppError::Bind(e, address))
    }

    pub async fn start(self) -> Result<(), AppError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), AppError> {
        let analysis = build_analysis_service(&self.configuration.analysis);
        let app = app_router(&self.configuration, analysis)?;

        let address = listener.local_addr().map_err(AppError::Serve)?;
        info!(
            %address,
            resize = ?self.configuration.analysis.target_dimensions(),
            boundary_policy = ?self.configuration.analysis.boundary_policy,
            cors = ?self.configuration.cors.policy,
            "Severity service listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(AppError::Serve)?;

        info!("Severity service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
