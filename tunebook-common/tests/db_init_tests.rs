//! Unit tests for database initialization
//!
//! Covers database creation, full-reload table reset and read-only access.

use tempfile::TempDir;
use tunebook_common::config::TuneDefaults;
use tunebook_common::db::{
    connect_readonly, count_tunes, insert_tune, load_all_tunes, open_database, reset_tunes_table,
};
use tunebook_common::{Error, TuneRecord};

fn sample_tune() -> TuneRecord {
    TuneRecord {
        sequence_id: "1".to_string(),
        title: Some("The Kesh".to_string()),
        tune_type: Some("jig".to_string()),
        key: Some("G".to_string()),
        meter: Some("6/8".to_string()),
        raw_body: "X:1\nT:The Kesh\nR:jig\nM:6/8\nK:G\n|:GAG GAB|\n".to_string(),
    }
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("tunes.db");

    let result = open_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    // Parent directory and file are created
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_reset_creates_expected_columns() {
    let temp_dir = TempDir::new().unwrap();
    let pool = open_database(&temp_dir.path().join("tunes.db")).await.unwrap();

    reset_tunes_table(&pool).await.unwrap();

    let columns: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info('tunes')")
        .fetch_all(&pool)
        .await
        .unwrap();
    let names: Vec<&str> = columns.iter().map(|(n,)| n.as_str()).collect();

    assert_eq!(
        names,
        vec!["id", "book_number", "title", "tune_type", "key", "meter", "raw_abc"]
    );
}

#[tokio::test]
async fn test_reset_discards_previous_rows() {
    let temp_dir = TempDir::new().unwrap();
    let pool = open_database(&temp_dir.path().join("tunes.db")).await.unwrap();
    let defaults = TuneDefaults::default();

    reset_tunes_table(&pool).await.unwrap();
    insert_tune(&pool, 1, &sample_tune(), &defaults).await.unwrap();
    insert_tune(&pool, 1, &sample_tune(), &defaults).await.unwrap();
    assert_eq!(count_tunes(&pool).await.unwrap(), 2);

    // Second run: full reload, ids restart
    reset_tunes_table(&pool).await.unwrap();
    assert_eq!(count_tunes(&pool).await.unwrap(), 0);

    let id = insert_tune(&pool, 2, &sample_tune(), &defaults).await.unwrap();
    assert_eq!(id, 1);
}

#[tokio::test]
async fn test_readonly_connection_reads_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("tunes.db");

    let pool = open_database(&db_path).await.unwrap();
    reset_tunes_table(&pool).await.unwrap();
    insert_tune(&pool, 7, &sample_tune(), &TuneDefaults::default())
        .await
        .unwrap();
    pool.close().await;

    let ro = connect_readonly(&db_path).await.unwrap();
    let rows = load_all_tunes(&ro).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].book_number, 7);
    assert_eq!(rows[0].meter.as_deref(), Some("6/8"));

    // Attempt write operation - should fail
    let result = sqlx::query("DELETE FROM tunes").execute(&ro).await;
    assert!(result.is_err(), "Write operation should fail in read-only mode");
}

#[tokio::test]
async fn test_readonly_missing_database() {
    let temp_dir = TempDir::new().unwrap();
    let result = connect_readonly(&temp_dir.path().join("absent.db")).await;

    assert!(matches!(result, Err(Error::NotFound(_))));
}
