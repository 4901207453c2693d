use crate::config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "onsite-predict")]
#[command(about = "HTTP service for house price and construction cost predictions")]
pub struct Cli {
    /// Path to TOML configuration file (defaults to ./onsite-predict.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the bind host from config
    #[arg(long)]
    pub host: Option<String>,

    /// Override the bind port from config
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Load config and models, print a summary and exit without serving
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
