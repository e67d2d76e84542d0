//! anonboard - command-line client for the anonymous discussion board.
//!
//! # Architecture
//!
//! The binary wires the library crates together and drives them one command
//! at a time:
//!
//! ```text
//! main() -> Settings -> BoardClient + IdentityStore -> Engine
//!                                                        |
//!                                   resolve_session() -> commands::run()
//!                                                        |
//!                                                        v
//!                                              render::view() to stdout
//! ```
//!
//! Logs go to `~/.anonboard/logs/anonboard.log`, never to the terminal.

mod commands;
mod render;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use board_client::BoardClient;
use board_config::{BoardConfig, Settings};
use board_engine::Engine;
use board_session::{DetachedIdentityStore, FileIdentityStore, IdentityStore};

use commands::Command;

#[derive(Parser)]
#[command(name = "anonboard")]
#[command(about = "Anonymous discussion board client", long_about = None)]
struct Cli {
    /// Identity slot file, overriding the configured and default locations.
    #[arg(long, global = true, value_name = "PATH")]
    identity_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, prefer no logs over interleaving them with command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.anonboard/logs/anonboard.log
    if let Some(config_dir) = board_config::config_dir() {
        candidates.push(config_dir.join("logs").join("anonboard.log"));
    }

    // Fallback: ./.anonboard/logs/anonboard.log
    candidates.push(PathBuf::from(".anonboard").join("logs").join("anonboard.log"));

    candidates
}

/// Resolve settings once. An unreadable config file is logged and ignored.
fn load_settings() -> Result<Settings> {
    let file = BoardConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring config file: {e}");
        None
    });
    Settings::resolve(file.as_ref(), |key| std::env::var(key).ok())
        .context("invalid board configuration")
}

fn identity_store(cli: &Cli, settings: &Settings) -> Arc<dyn IdentityStore> {
    let configured = cli
        .identity_file
        .clone()
        .or_else(|| settings.identity_path.clone())
        .map(FileIdentityStore::new)
        .or_else(FileIdentityStore::default_location);

    match configured {
        Some(store) => {
            tracing::debug!(path = %store.path().display(), "Using identity slot");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No data directory available; identity will not persist");
            Arc::new(DetachedIdentityStore)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings()?;
    let client = BoardClient::new(settings.api_base.clone(), settings.connect_timeout)
        .context("failed to build HTTP client")?;
    let store = identity_store(&cli, &settings);

    let mut engine = Engine::new(store, client);
    engine.resolve_session().await;

    let outcome = commands::run(&mut engine, cli.command).await;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
