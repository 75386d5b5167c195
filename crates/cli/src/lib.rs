use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "openmatch")]
#[command(about = "openmatch - a continuous limit order matching engine")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the matching engine with the given configuration
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/openmatch.yaml")]
        config: PathBuf,

        /// Override the HTTP port
        #[arg(long)]
        http: Option<u16>,
    },

    /// Validate configuration without starting the engine
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/openmatch.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "openmatch.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
