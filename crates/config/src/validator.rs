use crate::EngineConfig;
use thiserror::Error;

const KNOWN_LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
const KNOWN_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Server host is required")]
    MissingServerHost,

    #[error("Server port must be non-zero")]
    InvalidServerPort,

    #[error("Unknown log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Unknown log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("default_depth ({default_depth}) must not exceed max_depth ({max_depth})")]
    DepthOutOfRange {
        default_depth: usize,
        max_depth: usize,
    },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

/// Validate a configuration before startup
pub fn validate_config(config: &EngineConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }
    if config.server.host.trim().is_empty() {
        report.add_error(ValidationError::MissingServerHost);
    }
    if config.server.port == 0 {
        report.add_error(ValidationError::InvalidServerPort);
    }

    if !KNOWN_LOG_FORMATS.contains(&config.logging.format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(
            config.logging.format.clone(),
        ));
    }
    if !KNOWN_LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogLevel(
            config.logging.level.clone(),
        ));
    }

    if config.engine.default_depth == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "engine.default_depth".to_string(),
        });
    }
    if config.engine.max_depth == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "engine.max_depth".to_string(),
        });
    }
    if config.engine.trade_history == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "engine.trade_history".to_string(),
        });
    }

    if config.engine.default_depth > config.engine.max_depth && config.engine.max_depth > 0 {
        report.add_error(ValidationError::DepthOutOfRange {
            default_depth: config.engine.default_depth,
            max_depth: config.engine.max_depth,
        });
    }

    if config.engine.max_depth > 1000 {
        report.add_warning(
            "engine.max_depth",
            "very large snapshot depths make the read path expensive",
        );
    }

    report
}
