//! tunebook-ingest - ABC books loader
//!
//! Walks `<books root>/<book number>/*.abc`, parses every tune and reloads the
//! `tunes` table from scratch. Prints a short summary of what was stored.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebook_common::config::TomlConfig;
use tunebook_common::db::{self, TuneColumn};
use tunebook_ingest::services::{reload_books, BookWalker};

/// Command-line arguments for tunebook-ingest
#[derive(Parser, Debug)]
#[command(name = "tunebook-ingest")]
#[command(about = "Load ABC tune books into the tunes database")]
#[command(version)]
struct Args {
    /// Folder holding the numbered book directories
    #[arg(short, long)]
    books_root: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// TOML config file (default: <config dir>/tunebook/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Visit books numerically and files by name instead of listing order
    #[arg(long)]
    sorted: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing (RUST_LOG wins over the configured level)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tunebook-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let books_root = config.resolve_books_root(args.books_root.as_deref());
    let db_path = config.resolve_database_path(args.database.as_deref());
    info!("Books folder: {}", books_root.display());
    info!("Database: {}", db_path.display());

    let pool = db::open_database(&db_path)
        .await
        .context("Failed to open database")?;

    let walker = BookWalker::new().sorted(args.sorted);
    let summary = reload_books(&pool, &walker, &books_root, &config.defaults)
        .await
        .context("Failed to load books")?;

    if summary.root_missing {
        eprintln!("Error: Directory '{}' not found!", books_root.display());
    }
    for error in &summary.errors {
        eprintln!("Skipped: {}", error);
    }

    println!(
        "Processing complete! Added {} tunes to database",
        summary.tunes_inserted
    );
    print_database_summary(&pool).await?;

    pool.close().await;
    Ok(())
}

/// Totals and frequency tables of what is now in the database
async fn print_database_summary(pool: &SqlitePool) -> Result<()> {
    let total = db::count_tunes(pool).await?;
    if total == 0 {
        return Ok(());
    }

    println!();
    println!("Database contains {} tunes", total);
    println!("Books: {}", db::count_books(pool).await?);

    for (heading, column) in [("Tune types", TuneColumn::TuneType), ("Keys", TuneColumn::Key)] {
        println!();
        println!("{}:", heading);
        for (value, count) in db::count_by(pool, column).await? {
            println!("  {:<24} {}", value.unwrap_or_default(), count);
        }
    }

    Ok(())
}
