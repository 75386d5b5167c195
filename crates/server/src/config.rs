//! Server configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Default HTTP port for the matching engine
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Bind configuration for the HTTP server
///
/// # Example
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::http_only("127.0.0.1", 8081);
/// assert!(config.has_servers());
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g. "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Optional HTTP port; `None` disables the HTTP server
    pub http_port: Option<u16>,
}

impl ServerConfig {
    /// Create a server config for HTTP on the given port
    pub fn http_only(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            http_port: Some(port),
        }
    }

    /// Get the HTTP socket address
    pub fn http_addr(&self) -> Option<Result<SocketAddr>> {
        self.http_port.map(|port| self.parse_addr(port))
    }

    /// Check if any servers are configured
    pub fn has_servers(&self) -> bool {
        self.http_port.is_some()
    }

    fn parse_addr(&self, port: u16) -> Result<SocketAddr> {
        format!("{}:{}", self.host, port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::http_only("0.0.0.0", DEFAULT_HTTP_PORT)
    }
}
