//! harbinger - batch audio encoding with the reference codec tools.
//!
//! Entry point for the CLI application.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use harbinger_core::{load_layered, validate_config};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = load_layered(cli.config.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Opus(args) => commands::opus(args, &config).await,
        Command::Flac(args) => commands::flac(args, &config).await,
        Command::Hash(args) => commands::hash(args).await,
    }
}

/// Logs go to stderr; stdout carries only results.
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
