//! Voxa server binary entry point.

use std::sync::Arc;

use clap::Parser;
use voxa::agent::SessionRegistry;
use voxa::cli::{Cli, Commands, ServeArgs};
use voxa::config::{ServerConfig, VoxaConfig};
use voxa::provider::ProviderRegistry;
use voxa::tools::ToolRegistry;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Tools => handle_tools(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = VoxaConfig::from_env();
    let mut config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    voxa::telemetry::init(&config);
    tracing::info!(
        environment = %config.environment,
        providers = ?credentials,
        "Starting voxa"
    );
    if !credentials.has_credentials("anthropic") && !credentials.has_credentials("openai") {
        tracing::warn!("No provider API keys configured, session creation will fail");
    }

    let providers = Arc::new(ProviderRegistry::with_defaults(credentials));
    let sessions = SessionRegistry::new(Arc::new(ToolRegistry::builtin()), providers);

    voxa::server::serve(&config, sessions).await?;
    Ok(())
}

fn handle_tools() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ToolRegistry::builtin();

    println!("Tools:");
    for tool in registry.tools() {
        let required = tool.parameters().required().join(", ");
        println!("  {:<32} {}", tool.name(), tool.description());
        if !required.is_empty() {
            println!("  {:<32} requires: {required}", "");
        }
    }

    println!("\nPresets:");
    for (key, names) in registry.presets() {
        println!("  {:<18} {}", key, names.join(", "));
    }
    Ok(())
}
