//! Command line for the `voxa` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Voxa voice agent service
#[derive(Parser, Debug)]
#[command(name = "voxa", version, about = "Voxa voice agent service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// List built-in tools and presets
    Tools,
}

/// Arguments for `voxa serve`. Flags override the config file and environment.
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply explicit flags on top of an already-loaded config.
    pub fn apply(&self, config: &mut crate::config::ServerConfig) {
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}
