//! Observability for openmatch
//!
//! Logger setup on top of `tracing` / `tracing-subscriber`, wired to the
//! service configuration for its format and default level.

pub mod logging;

pub use logging::{init_logging, LogFormat};
