//! DropZone: browse, upload, and organise files from the terminal.
//!
//! Main entry point that wires the crates together and starts the shell.

mod output;
mod shell;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use dropzone_core::config::AppConfig;
use dropzone_core::error::AppError;
use dropzone_core::traits::{Clock, NotificationQueue, Notifier, RecordClient, SystemClock};
use dropzone_service::{Browser, FileService, FolderService};
use dropzone_store::MemoryRecordClient;

use crate::output::OutputFormat;
use crate::shell::Shell;

/// DropZone interactive file browser
#[derive(Debug, Parser)]
#[command(name = "dropzone", version, about = "DropZone file browser")]
struct Cli {
    /// Configuration file (TOML). Missing files fall back to defaults.
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, cli.format).await {
        tracing::error!(error = %e, "DropZone exited with an error");
        output::print_error(&e.message);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Logs go to stderr so they never mix with
/// shell output.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

async fn run(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    tracing::info!("Starting DropZone v{}", env!("CARGO_PKG_VERSION"));

    if !config.backend.is_configured() {
        tracing::warn!(
            "Backend project id or public key missing; using the in-memory record store"
        );
    }

    let client: Arc<dyn RecordClient> = Arc::new(MemoryRecordClient::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let queue = Arc::new(NotificationQueue::new());
    let notifier: Arc<dyn Notifier> = queue.clone();

    let files = FileService::new(Arc::clone(&client), Arc::clone(&clock));
    let folders = FolderService::new(client, clock);

    let mut browser = Browser::new(
        files,
        folders,
        notifier,
        config.browser.clone(),
        &config.upload,
    );
    browser.load().await?;
    tracing::info!("Library loaded");

    Shell::new(browser, queue, format).run().await?;

    tracing::info!("DropZone stopped");
    Ok(())
}
