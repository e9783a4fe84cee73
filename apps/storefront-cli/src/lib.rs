//! # Storefront CLI Library
//!
//! This is the main library crate for the storefront command-line shell.
//! It wires the persisted stores to a one-shot command runner.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront CLI Process                           │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  args (clap)  ──►  StateConfig (file + env + flags)               │ │
//! │  └────────────────────────────────┬──────────────────────────────────┘ │
//! │                                   ▼                                     │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  StoreOrchestrator::mount()  (rehydrate, follow system theme)     │ │
//! │  └────────────────────────────────┬──────────────────────────────────┘ │
//! │                                   ▼                                     │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │  commands::dispatch  ──►  stdout JSON  |  stderr ApiError JSON    │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod args;
pub mod commands;
pub mod error;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use storefront_core::ColorScheme;
use storefront_state::{StateConfig, StorageBackend, StoreOrchestrator, SystemThemeSignal};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::error::ApiError;

/// Parses arguments, runs one command and reports the outcome.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match execute(cli).await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Command failed");
            match serde_json::to_string_pretty(&err) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Builds and mounts the stores, then dispatches the command.
pub async fn execute(cli: Cli) -> Result<String, ApiError> {
    let config = load_config(&cli)?;
    info!(backend = %config.storage.backend, "Configuration loaded");

    let system = Arc::new(SystemThemeSignal::from_prefers_dark(cli.prefers_dark));
    let orchestrator = StoreOrchestrator::builder()
        .config(config)
        .color_scheme_source(system)
        .theme_applier(Arc::new(|scheme: ColorScheme| {
            debug!(scheme = %scheme, "Theme applied");
        }))
        .build()?;

    let _mounted = orchestrator.mount();
    commands::dispatch(&orchestrator, cli.command).await
}

/// File and environment first, then command-line flags.
fn load_config(cli: &Cli) -> Result<StateConfig, ApiError> {
    let mut config = StateConfig::load(cli.config.clone())?;

    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    } else if let Some(dir) = &cli.data_dir {
        config.storage.backend = StorageBackend::File;
        config.storage.dir = Some(dir.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - ERROR: Command failures
/// - WARN: Swallowed storage failures, discarded persisted state
/// - INFO: Mount lifecycle
/// - DEBUG: Individual store mutations
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info,storefront=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
