//! mcp-poke CLI
//!
//! Starts the desktop notification MCP server on stdio.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use mcp_poke::config::{default_config_path, Config};
use mcp_poke::notifier::Notifier;
use mcp_poke::server::McpServer;

/// mcp-poke - desktop notifications for AI agents
#[derive(Parser)]
#[command(name = "mcp-desktop-notification")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (default: platform-specific)
    #[arg(long, env = "MCP_POKE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Dry run mode (log notifications without sending)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries JSON-RPC, so logs go to stderr
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load_default().context("Failed to load configuration")?,
    };

    config.apply_overrides(cli.verbose, cli.dry_run);

    if config.verbose() {
        let path = cli.config.unwrap_or_else(default_config_path);
        info!(
            path = %path.display(),
            dry_run = config.dry_run(),
            verbose = config.verbose(),
            "[Main] Configuration loaded"
        );
    }

    let config = Arc::new(config);
    let notifier = Notifier::from_config(config.clone()).context("Failed to create notifier")?;

    if config.verbose() {
        info!(kind = notifier.kind(), "[Main] Notifier created successfully");
        info!("[Main] Starting MCP server...");
    }

    McpServer::new(config, Arc::new(notifier))
        .run_stdio()
        .await
        .context("Server error")
}
