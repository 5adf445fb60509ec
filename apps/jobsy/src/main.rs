mod commands;
mod config;
mod display;
mod errors;
mod features;
mod grounding;
mod ingest;
mod llm_client;
mod models;
mod quiz;
mod render;
mod state;
mod store;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{dispatch, Cli};
use crate::config::Config;
use crate::state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only rendered output.
    let level = if cli.verbose { "debug" } else { config.rust_log.as_str() };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .ok()
                .filter(|_| !cli.verbose)
                .unwrap_or_else(|| EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Jobsy v{}", env!("CARGO_PKG_VERSION"));
    debug!("Profile store: {}", config.store_path.display());

    let mut state = AppState::<store::FileStore>::from_config(&config, cli.json)?;

    match dispatch(&mut state, cli.command).await {
        Ok(outcome) => Ok(outcome.exit_code()),
        Err(e) => {
            debug!("Command failed: {e:?}");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
