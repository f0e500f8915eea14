//! `tunes` table access
//!
//! Writes come from the ingest loader, reads from the query shell and the
//! ingest summary.

use crate::config::TuneDefaults;
use crate::db::models::{TuneColumn, TuneRow};
use crate::tune::TuneRecord;
use crate::Result;
use sqlx::{Executor, Sqlite, SqlitePool};

/// Insert one tune, applying `defaults` to absent header fields
///
/// Returns the row id assigned by SQLite.
pub async fn insert_tune<'e, E>(
    executor: E,
    book_number: i64,
    tune: &TuneRecord,
    defaults: &TuneDefaults,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO tunes (book_number, title, tune_type, key, meter, raw_abc)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(book_number)
    .bind(tune.title.as_deref().unwrap_or(&defaults.title))
    .bind(tune.tune_type.as_deref().unwrap_or(&defaults.tune_type))
    .bind(tune.key.as_deref().unwrap_or(&defaults.key))
    .bind(tune.meter.as_deref().unwrap_or(&defaults.meter))
    .bind(&tune.raw_body)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert every tune of one file inside a single transaction
///
/// Returns the number of rows written. Nothing is written if any insert fails.
pub async fn insert_book_file(
    pool: &SqlitePool,
    book_number: i64,
    tunes: &[TuneRecord],
    defaults: &TuneDefaults,
) -> Result<usize> {
    let mut tx = pool.begin().await?;

    for tune in tunes {
        insert_tune(&mut *tx, book_number, tune, defaults).await?;
    }

    tx.commit().await?;

    Ok(tunes.len())
}

/// Load the whole table, ordered by id
pub async fn load_all_tunes(pool: &SqlitePool) -> Result<Vec<TuneRow>> {
    let rows = sqlx::query_as::<_, TuneRow>(
        "SELECT id, book_number, title, tune_type, key, meter, raw_abc FROM tunes ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total number of rows
pub async fn count_tunes(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tunes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Number of distinct book numbers
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT book_number) FROM tunes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Row counts grouped by `column`, most frequent first
pub async fn count_by(pool: &SqlitePool, column: TuneColumn) -> Result<Vec<(Option<String>, i64)>> {
    let sql = format!(
        "SELECT {col}, COUNT(*) AS n FROM tunes GROUP BY {col} ORDER BY n DESC, {col} ASC",
        col = column.as_str()
    );

    let counts = sqlx::query_as::<_, (Option<String>, i64)>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::{open_database, reset_tunes_table};
    use tempfile::TempDir;

    fn tune(id: &str, title: Option<&str>, tune_type: Option<&str>, key: Option<&str>) -> TuneRecord {
        TuneRecord {
            sequence_id: id.to_string(),
            title: title.map(str::to_string),
            tune_type: tune_type.map(str::to_string),
            key: key.map(str::to_string),
            meter: None,
            raw_body: format!("X:{}\nT:{}\n", id, title.unwrap_or("")),
        }
    }

    async fn fresh_pool() -> (TempDir, SqlitePool) {
        let temp_dir = TempDir::new().unwrap();
        let pool = open_database(&temp_dir.path().join("tunes.db")).await.unwrap();
        reset_tunes_table(&pool).await.unwrap();
        (temp_dir, pool)
    }

    #[tokio::test]
    async fn test_insert_applies_defaults() {
        let (_dir, pool) = fresh_pool().await;
        let defaults = TuneDefaults::default();

        insert_tune(&pool, 4, &tune("1", None, None, None), &defaults)
            .await
            .unwrap();

        let rows = load_all_tunes(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].book_number, 4);
        assert_eq!(rows[0].title.as_deref(), Some("Unknown"));
        assert_eq!(rows[0].tune_type.as_deref(), Some("Unknown"));
        assert_eq!(rows[0].key.as_deref(), Some(""));
        assert_eq!(rows[0].meter.as_deref(), Some(""));
        assert_eq!(rows[0].raw_abc.as_deref(), Some("X:1\nT:\n"));
    }

    #[tokio::test]
    async fn test_insert_book_file_counts_and_ids() {
        let (_dir, pool) = fresh_pool().await;
        let tunes = vec![
            tune("1", Some("Banish Misfortune"), Some("jig"), Some("Dmix")),
            tune("2", Some("The Silver Spear"), Some("reel"), Some("D")),
            tune("3", Some("Morrison's"), Some("jig"), Some("Edor")),
        ];

        let written = insert_book_file(&pool, 1, &tunes, &TuneDefaults::default())
            .await
            .unwrap();
        assert_eq!(written, 3);

        let rows = load_all_tunes(&pool).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rows[1].title.as_deref(), Some("The Silver Spear"));
    }

    #[tokio::test]
    async fn test_counts() {
        let (_dir, pool) = fresh_pool().await;
        let defaults = TuneDefaults::default();

        insert_book_file(
            &pool,
            1,
            &[
                tune("1", Some("A"), Some("jig"), Some("D")),
                tune("2", Some("B"), Some("reel"), Some("G")),
            ],
            &defaults,
        )
        .await
        .unwrap();
        insert_book_file(&pool, 2, &[tune("1", Some("C"), Some("jig"), Some("D"))], &defaults)
            .await
            .unwrap();

        assert_eq!(count_tunes(&pool).await.unwrap(), 3);
        assert_eq!(count_books(&pool).await.unwrap(), 2);

        let by_type = count_by(&pool, TuneColumn::TuneType).await.unwrap();
        assert_eq!(
            by_type,
            vec![(Some("jig".to_string()), 2), (Some("reel".to_string()), 1)]
        );

        let by_key = count_by(&pool, TuneColumn::Key).await.unwrap();
        assert_eq!(by_key[0], (Some("D".to_string()), 2));
    }
}
