use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load a configuration file from disk
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse configuration from YAML content, applying env substitution
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let substituted = substitution::substitute_env_vars(content)?;

    let config: EngineConfig =
        serde_yaml::from_str(&substituted).with_context(|| "Failed to parse YAML configuration")?;

    Ok(config)
}

/// Build a configuration with every default applied
#[instrument]
pub fn generate_default_config() -> EngineConfig {
    EngineConfig::default()
}

/// Write a configuration to disk as YAML
#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &EngineConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}
