//! HTTP front door for the engine API
//!
//! Serving is split in two phases. `bind` claims the socket and reports
//! the address actually bound, which is what the caller logs and what
//! tests rely on when they ask for an ephemeral port. `serve` then runs
//! the router until the shutdown token fires and drains in-flight
//! requests before returning. A submission that already holds the book
//! lock completes; the listener just stops accepting new connections.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Bound HTTP server ready to serve the engine API
#[derive(Debug)]
pub struct ApiServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl ApiServer {
    /// Claim the configured socket
    pub async fn bind(config: &ServerConfig, router: Router) -> Result<Self> {
        let addr = config
            .http_addr()
            .ok_or_else(|| ServerError::ConfigError("no HTTP port configured".into()))??;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, "engine API bound");

        Ok(Self {
            listener,
            local_addr,
            router,
        })
    }

    /// The address actually bound; differs from the config when port 0
    /// was requested
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept requests until `shutdown` fires, then drain and return
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        info!(addr = %self.local_addr, "engine API accepting requests");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("draining in-flight API requests");
            })
            .await
            .map_err(ServerError::Io)?;

        info!("engine API stopped");
        Ok(())
    }
}
