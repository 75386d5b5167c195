//! Logger setup for the engine
//!
//! The default level comes from the service configuration
//! (`logging.level`), so a deployment can turn on `debug` for the
//! matching path without touching the environment; `RUST_LOG` still wins
//! when set, which is the knob used in development. The output format is
//! chosen per deployment: `pretty` for terminals, `json` for log
//! aggregation, `compact` for dense single-line output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored; for running in a terminal
    #[default]
    Pretty,
    /// One JSON object per event; for log aggregation
    Json,
    /// Dense single-line output
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Install the global logger
///
/// `default_level` is any filter directive `tracing_subscriber` accepts
/// (normally just a level like `info` or `debug`); it applies only when
/// `RUST_LOG` is unset.
pub fn init_logging(service_name: &str, format: LogFormat, default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_ansi(true))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true))
            .init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).init(),
    }

    tracing::info!(
        service = service_name,
        ?format,
        level = default_level,
        "logger ready"
    );

    Ok(())
}
