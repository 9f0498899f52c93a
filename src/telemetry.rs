//! Tracing subscriber setup for the server binary.

use tracing_subscriber::EnvFilter;

use crate::config::{Environment, ServerConfig};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Development gets human-readable lines, production gets JSON.
pub fn init(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.environment {
        Environment::Development => builder.try_init(),
        Environment::Production => builder.json().flatten_event(true).try_init(),
    };

    if let Err(e) = installed {
        eprintln!("tracing subscriber already installed: {e}");
    }
}
