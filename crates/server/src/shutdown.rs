//! Stop-signal handling
//!
//! The engine keeps all state in memory, so there is nothing to flush on
//! exit; shutting down cleanly only means letting in-flight submissions
//! finish instead of cutting their connections. `shutdown_token` returns
//! the `CancellationToken` handed to [`ApiServer::serve`](crate::ApiServer)
//! and cancels it on Ctrl+C or, on unix, SIGTERM, so container runtimes
//! get the same drain as an interactive stop.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Token that fires when the process is told to stop
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();

    let signal_token = token.clone();
    tokio::spawn(async move {
        if wait_for_stop_signal().await {
            info!("stop signal received, shutting the engine down");
        } else {
            warn!("signal listener failed, shutting the engine down");
        }
        signal_token.cancel();
    });

    token
}

#[cfg(unix)]
async fn wait_for_stop_signal() -> bool {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            result = tokio::signal::ctrl_c() => result.is_ok(),
            _ = term.recv() => true,
        },
        Err(e) => {
            warn!(error = %e, "cannot watch SIGTERM, falling back to Ctrl+C only");
            tokio::signal::ctrl_c().await.is_ok()
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_stop_signal() -> bool {
    tokio::signal::ctrl_c().await.is_ok()
}
