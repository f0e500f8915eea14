//! tunebook-query - Read-only console over the tunes database
//!
//! Loads the `tunes` table built by tunebook-ingest into memory and runs the
//! interactive menu on stdin/stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebook_common::config::TomlConfig;
use tunebook_common::db;
use tunebook_query::{QueryShell, TuneTable};

/// Command-line arguments for tunebook-query
#[derive(Parser, Debug)]
#[command(name = "tunebook-query")]
#[command(about = "Browse and search the tunes database")]
#[command(version)]
struct Args {
    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// TOML config file (default: <config dir>/tunebook/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr so they never interleave with the menu on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting tunebook-query v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let db_path = config.resolve_database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = match db::connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let table = TuneTable::load(&pool)
        .await
        .context("Failed to load tunes table")?;
    pool.close().await;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    QueryShell::new(&table, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
