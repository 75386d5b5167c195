//! openmatch server binary
//!
//! Entry point for the matching engine service: loads and validates the
//! configuration, initializes logging, builds the engine and its HTTP
//! router, and serves until Ctrl+C.

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config, save_config, validate_config, EngineConfig};
use matching_engine::api::{create_router, ApiState};
use matching_engine::MatchingEngine;
use observability::{init_logging, LogFormat};
use server::{health_routes, shutdown_token, ApiServer, HealthState, ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start { config, http } => start_engine(config, http).await,
        Commands::Validate { config } => validate_command(config),
        Commands::Init { output } => init_command(output),
    }
}

async fn start_engine(config_path: PathBuf, http_override: Option<u16>) -> Result<()> {
    let config = load_or_default(&config_path)?;

    let format: LogFormat = config.logging.format.parse().unwrap_or_default();
    init_logging(&config.service.name, format, &config.logging.level)?;

    if !config_path.exists() {
        warn!(path = ?config_path, "Config file not found, using built-in defaults");
    }

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start engine due to configuration errors");
    }

    let http_port = http_override.unwrap_or(config.server.port);
    info!(
        service = %config.service.name,
        host = %config.server.host,
        port = http_port,
        "Starting matching engine"
    );

    let engine = Arc::new(MatchingEngine::with_trade_history(
        config.engine.trade_history,
    ));
    let api_state = ApiState::new(
        Arc::clone(&engine),
        config.engine.default_depth,
        config.engine.max_depth,
    );
    let health_state = Arc::new(HealthState::new(&config.service.name));

    let router = create_router(api_state).merge(health_routes(health_state));

    let server_config = ServerConfig::http_only(config.server.host.clone(), http_port);
    let server = ApiServer::bind(&server_config, router).await?;
    server.serve(shutdown_token()).await?;

    info!("Matching engine stopped");
    Ok(())
}

fn load_or_default(path: &Path) -> Result<EngineConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(generate_default_config())
    }
}

fn validate_command(config_path: PathBuf) -> Result<()> {
    init_logging("openmatch", LogFormat::Pretty, "info")?;

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!("Bind: {}:{}", config.server.host, config.server.port);
    println!(
        "Log format: {} (level {})",
        config.logging.format, config.logging.level
    );
    println!(
        "Snapshot depth: {} (max {})",
        config.engine.default_depth, config.engine.max_depth
    );
    println!("Trade history per symbol: {}", config.engine.trade_history);

    Ok(())
}

fn init_command(output_path: PathBuf) -> Result<()> {
    init_logging("openmatch", LogFormat::Pretty, "info")?;

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, &output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!(
        "  1. Run 'openmatch validate --config {:?}' to check the configuration",
        output_path
    );
    println!(
        "  2. Run 'openmatch start --config {:?}' to start the engine",
        output_path
    );

    Ok(())
}
