//! Database initialization
//!
//! Two ways in:
//! - [`open_database`] for the ingest run (read/write, file created on demand)
//! - [`connect_readonly`] for the query shell (file must already exist)
//!
//! The `tunes` table is never migrated. Every ingest run drops and recreates
//! it through [`reset_tunes_table`].

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (or create) the database used by an ingest run
pub async fn open_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    // Single writer: all inserts are serialized through one connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    Ok(pool)
}

/// Connect to an existing database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Database not found: {}\nRun tunebook-ingest first to build the database.",
            db_path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Drop and recreate the `tunes` table (full reload, no upsert)
pub async fn reset_tunes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DROP TABLE IF EXISTS tunes")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE tunes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_number INTEGER,
            title TEXT,
            tune_type TEXT,
            key TEXT,
            meter TEXT,
            raw_abc TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Tunes table recreated");

    Ok(())
}
