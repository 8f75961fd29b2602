use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::prelude::*;

use chat_client::config::{ChatConfig, FileConfig, default_config_path, load_config};

#[derive(Parser)]
#[command(name = "chat")]
#[command(about = "Chat with a streaming chatbot backend over WebSocket")]
struct Cli {
    /// Config file (defaults to <config dir>/chat_client/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend WebSocket endpoint, e.g. ws://localhost:8000/ws
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Send one message, print the reply, and exit
    #[arg(short, long)]
    message: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the reply
    let default_directive = if cli.debug {
        "chat_client=debug,token_stream=debug,info"
    } else {
        "chat_client=warn,token_stream=warn,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    debug!("Config file: {}", config_path.display());

    let mut file_config: FileConfig = load_config(&config_path)
        .extract()
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(endpoint) = cli.endpoint {
        file_config.connection.endpoint = endpoint;
    }
    let config = ChatConfig::from_file(&file_config)?;

    let outcome = chat_client::run(&config, cli.message).await?;
    Ok(outcome.exit_code())
}
