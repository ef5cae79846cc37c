//! Web server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{MeshmonError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// HTTP server for the API.
pub struct WebServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, state: Arc<AppState>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| MeshmonError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            state,
            cors_origins: config.cors_origins.clone(),
        })
    }

    /// The configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> axum::Router {
        create_router(self.state.clone(), &self.cors_origins).merge(create_health_router())
    }

    /// Run the server until interrupted.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("backend listening on http://{local_addr}");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("backend listening on http://{local_addr}");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("web server error: {e}");
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("shutdown signal received");
}
