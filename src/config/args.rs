//! Command-line arguments
//!
//! The server has no subcommands; flags only locate the configuration and
//! override the listen address.

use clap::Parser;

use super::AppConfig;

/// snaplink - an in-memory URL shortener
#[derive(Parser, Debug, Default)]
#[command(name = "snaplink")]
#[command(version)]
#[command(about = "An in-memory URL shortener with click tracking", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Override server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Override server.port
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Write a sample configuration file to the given path and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
