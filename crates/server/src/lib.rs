//! HTTP serving for openmatch
//!
//! There is exactly one server in this system, the engine's HTTP front
//! door, so no server polymorphism lives here. [`ApiServer`] binds its
//! socket up front (reporting the real address, which is what tests use
//! with ephemeral ports) and then serves until a shutdown token fires.
//! [`shutdown_token`] produces that token from Ctrl+C or SIGTERM.
//!
//! # Modules
//!
//! - [`config`] - bind configuration
//! - [`http`] - the bound server and its serve loop
//! - [`health`] - health check endpoint
//! - [`shutdown`] - stop-signal handling

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod shutdown;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{health_routes, HealthState};
pub use http::ApiServer;
pub use shutdown::shutdown_token;
