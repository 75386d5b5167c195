//! Configuration for the openmatch service
//!
//! A single YAML file describes the service: where to bind, how to log,
//! and the engine's snapshot/trade-history limits. Values support
//! `${ENV_VAR}` substitution, every field has a default, and a validation
//! report is produced before startup.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::{generate_default_config, load_config, parse_config, save_config};
pub use substitution::substitute_env_vars;
pub use validator::{validate_config, ValidationError, ValidationReport, ValidationWarning};

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: MatchingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            server: HttpConfig::default(),
            logging: LoggingConfig::default(),
            engine: MatchingConfig::default(),
        }
    }
}

/// Service identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

/// HTTP bind settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `pretty`, `json`, `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Default log level when `RUST_LOG` is unset; one of `trace`,
    /// `debug`, `info`, `warn`, `error`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

/// Matching engine limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Snapshot depth when the request does not specify one
    #[serde(default = "default_depth")]
    pub default_depth: usize,
    /// Hard ceiling on requested snapshot depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Recent trades retained per symbol
    #[serde(default = "default_trade_history")]
    pub trade_history: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            max_depth: default_max_depth(),
            trade_history: default_trade_history(),
        }
    }
}
