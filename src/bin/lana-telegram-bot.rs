use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use lana_engine::ChatEngine;
use lana_models::Config;
use lana_sandbox::{demo_transcript, read_lines_safely, run_interactive, run_session};
use lana_store::Store;
use lana_telegram::Poller;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "lana-telegram-bot")]
#[command(about = "Lana - AI companion bot for Telegram")]
struct Cli {
    /// Run the local sandbox instead of the Telegram transport
    #[arg(long)]
    local: bool,

    /// Path to a file with input lines for a scripted local run
    #[arg(long)]
    script: Option<PathBuf>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(explicit: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        let contents = fs::read_to_string(path)?;
        return Ok(toml::from_str(&contents)?);
    }

    // Try to load from various config locations
    let config_paths = ["configs/default.toml", "config/config.toml"];
    for path in &config_paths {
        if Path::new(path).exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
    }

    Err("No config file found".into())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration from file or use defaults; env vars win
    let mut config = load_config(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Failed to load config file: {}, using defaults", e);
        Config::default()
    });
    config.apply_env();

    let store = Store::connect(&config.data).await?;
    store.migrate().await?;
    info!("Database ready");

    let engine = Arc::new(ChatEngine::from_config(store, &config));

    let local_mode = cli.local
        || cli.script.is_some()
        || std::env::var("LANA_MODE").as_deref() == Ok("local");
    if local_mode {
        return run_local(&engine, cli.script).await;
    }

    let poller = Poller::new(&config.telegram, engine)?;
    info!(
        "Lana is alive (Telegram). Free/day={}, model={}",
        config.chat.free_messages_per_day, config.openai.model
    );
    let poll_handle = tokio::spawn(poller.run());

    // Wait for shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => warn!("Unable to listen for shutdown signal: {}", err),
    }

    poll_handle.abort();
    info!("Lana shutdown complete");
    Ok(())
}

async fn run_local(engine: &ChatEngine, script: Option<PathBuf>) -> Result<()> {
    let mut out = io::stdout();

    if let Some(path) = script {
        let contents = fs::read_to_string(path)?;
        let lines = contents.lines().map(str::to_string).collect::<Vec<_>>();
        run_session(engine, lines, &mut out).await?;
        return Ok(());
    }

    if !io::stdin().is_terminal() {
        let lines = read_lines_safely(io::stdin());
        if lines.is_empty() {
            // No input available, play the demo and exit
            println!("Lana non-interactive demo ✨ (no stdin detected)");
            run_session(engine, demo_transcript(), &mut out).await?;
        } else {
            run_session(engine, lines, &mut out).await?;
        }
        return Ok(());
    }

    run_interactive(engine).await?;
    Ok(())
}
