//! ACC - excerpt collector with source re-anchoring
//!
//! Main entry point for the ACC CLI.

mod cli;
mod cmd_locate;
mod cmd_store;

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use acc_config::{ConfigLoader, ConfigValidator, LoggingConfig, default_config_path};

use crate::cli::{Cli, Commands};

/// Keeps the file writer flushing for the life of the process.
static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Stdout carries command output, so the console layer writes to stderr.
    let console = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);

    let file = if config.file {
        let log_dir = PathBuf::from(ConfigLoader::expand_path(&config.dir.to_string_lossy()));
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("acc")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = ConfigLoader::load_or_default(&config_path)?;
    init_tracing(&config.logging)?;
    debug!("Using config {}", config_path.display());

    for warning in ConfigValidator::validate(&config)?.into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    match cli.command {
        Commands::Nodes { page } => cmd_store::handle_nodes(&config, &page),
        Commands::Save(args) => cmd_store::handle_save(&config, args).await,
        Commands::List { format } => cmd_store::handle_search(&config, "", format).await,
        Commands::Search { keyword, format } => {
            cmd_store::handle_search(&config, &keyword, format).await
        }
        Commands::Delete { ids } => cmd_store::handle_delete(&config, ids).await,
        Commands::Clear { yes } => cmd_store::handle_clear(&config, yes).await,
        Commands::Retitle { id, title } => cmd_store::handle_retitle(&config, id, title).await,
        Commands::Link { id } => cmd_store::handle_link(&config, &id).await,
        Commands::Locate { page, fragment } => {
            cmd_locate::handle_locate(&config, &page, &fragment).await
        }
    }
}
