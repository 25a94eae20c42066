use anyhow::Result;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::AppConfig;
use crate::remote::RemoteDataService;

pub struct ServerService {
    config: AppConfig,
    service: Arc<dyn RemoteDataService>,
}

impl ServerService {
    pub fn new(config: AppConfig, service: Arc<dyn RemoteDataService>) -> Self {
        Self { config, service }
    }

    pub async fn run(&self) -> Result<()> {
        let state = Arc::new(AppState::new(Arc::clone(&self.service)));
        state.mount().await;

        let app = create_router(Arc::clone(&state), &self.config.server.assets_dir).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.port));
        info!("Server listening on {}", addr);
        info!(
            "Serving assets from {} with data from {}",
            self.config.server.assets_dir, self.config.remote.url
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        state.teardown();
        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    shutdown_on(tokio::signal::ctrl_c()).await
}

/// Resolves when `signal` fires; never, if it cannot be listened for
async fn shutdown_on(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_follows_signal() {
        let shutdown = tokio::time::timeout(Duration::from_secs(1), shutdown_on(async { Ok(()) }));
        assert!(shutdown.await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_signal_keeps_serving() {
        let signal = async { Err(std::io::Error::other("no signal driver")) };
        let shutdown = tokio::time::timeout(Duration::from_millis(50), shutdown_on(signal));
        assert!(shutdown.await.is_err());
    }
}
