//! Book loader
//!
//! Walks a books root and writes every parsed tune into the `tunes` table.
//! One transaction per file; the pool is opened once by the caller and shared
//! for the whole run.

use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, warn};
use tunebook_common::config::TuneDefaults;
use tunebook_common::db::{insert_book_file, reset_tunes_table};
use tunebook_common::Result;

use super::book_walker::{BookWalker, WalkOutcome};

/// Totals for one load run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Distinct books that contributed at least one file
    pub books: usize,
    /// Tune files parsed
    pub files: usize,
    /// Rows written to the `tunes` table
    pub tunes_inserted: usize,
    /// Books root was missing
    pub root_missing: bool,
    /// Entries skipped during the walk
    pub errors: Vec<String>,
}

/// Persist an already walked books root
pub async fn store_outcome(
    pool: &SqlitePool,
    outcome: &WalkOutcome,
    defaults: &TuneDefaults,
) -> Result<LoadSummary> {
    let mut tunes_inserted = 0;

    for file in &outcome.files {
        if file.tunes.is_empty() {
            continue;
        }
        tunes_inserted += insert_book_file(pool, file.book_number, &file.tunes, defaults).await?;
    }

    Ok(LoadSummary {
        books: outcome.book_count(),
        files: outcome.files.len(),
        tunes_inserted,
        root_missing: outcome.root_missing,
        errors: outcome.errors.iter().map(|e| e.to_string()).collect(),
    })
}

/// Walk `root` and write its tunes into the existing `tunes` table
pub async fn load_books(
    pool: &SqlitePool,
    walker: &BookWalker,
    root: &Path,
    defaults: &TuneDefaults,
) -> Result<LoadSummary> {
    let outcome = walker.walk(root);

    if outcome.root_missing {
        warn!("Nothing to load: books folder '{}' not found", root.display());
    }
    for error in &outcome.errors {
        warn!("Skipped: {}", error);
    }

    let summary = store_outcome(pool, &outcome, defaults).await?;

    info!(
        "Processing complete! Added {} tunes to database ({} file(s), {} book(s))",
        summary.tunes_inserted, summary.files, summary.books
    );

    Ok(summary)
}

/// Full reload: recreate the `tunes` table, then load every book
pub async fn reload_books(
    pool: &SqlitePool,
    walker: &BookWalker,
    root: &Path,
    defaults: &TuneDefaults,
) -> Result<LoadSummary> {
    reset_tunes_table(pool).await?;
    load_books(pool, walker, root, defaults).await
}
