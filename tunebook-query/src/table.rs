//! In-memory tune table
//!
//! The query shell reads the whole `tunes` table once per session and answers
//! every filter from memory. Text filters are case-insensitive substring
//! matches; a NULL column never matches.

use sqlx::SqlitePool;
use tunebook_common::db::{load_all_tunes, TuneRow};
use tunebook_common::Result;

/// Rows loaded from the `tunes` table, in id order
#[derive(Debug, Clone, Default)]
pub struct TuneTable {
    rows: Vec<TuneRow>,
}

/// Summary statistics over a [`TuneTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub total: usize,
    /// Distinct book numbers
    pub books: usize,
    /// Counts per tune type, most frequent first
    pub by_type: Vec<(String, usize)>,
    /// Counts per key, most frequent first
    pub by_key: Vec<(String, usize)>,
}

impl TuneTable {
    pub fn new(rows: Vec<TuneRow>) -> Self {
        Self { rows }
    }

    /// Read the full table
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        Ok(Self::new(load_all_tunes(pool).await?))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn all(&self) -> &[TuneRow] {
        &self.rows
    }

    /// Tunes of one book
    pub fn by_book(&self, book_number: i64) -> Vec<&TuneRow> {
        self.rows
            .iter()
            .filter(|row| row.book_number == book_number)
            .collect()
    }

    /// Tunes whose type contains `term`, ignoring case
    pub fn by_type(&self, term: &str) -> Vec<&TuneRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| contains_ignore_case(row.tune_type.as_deref(), &needle))
            .collect()
    }

    /// Tunes whose title contains `term`, ignoring case
    pub fn search_title(&self, term: &str) -> Vec<&TuneRow> {
        let needle = term.to_lowercase();
        self.rows
            .iter()
            .filter(|row| contains_ignore_case(row.title.as_deref(), &needle))
            .collect()
    }

    pub fn stats(&self) -> TableStats {
        let mut books: Vec<i64> = self.rows.iter().map(|row| row.book_number).collect();
        books.sort_unstable();
        books.dedup();

        TableStats {
            total: self.rows.len(),
            books: books.len(),
            by_type: value_counts(self.rows.iter().map(|row| row.tune_type.as_deref())),
            by_key: value_counts(self.rows.iter().map(|row| row.key.as_deref())),
        }
    }
}

/// `needle` must already be lowercase
fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}

/// Occurrences of each non-NULL value, by descending count then value
fn value_counts<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<(String, usize)> {
    let mut counts: std::collections::BTreeMap<&str, usize> = Default::default();
    for value in values.flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(id: i64, book: i64, title: &str, tune_type: &str, key: &str) -> TuneRow {
        TuneRow {
            id,
            book_number: book,
            title: Some(title.to_string()),
            tune_type: Some(tune_type.to_string()),
            key: Some(key.to_string()),
            meter: Some(String::new()),
            raw_abc: Some(format!("X:{}\nT:{}\n", id, title)),
        }
    }

    pub(crate) fn sample_table() -> TuneTable {
        TuneTable::new(vec![
            row(1, 1, "The Kesh", "jig", "G"),
            row(2, 1, "The Silver Spear", "reel", "D"),
            row(3, 2, "Drowsy Maggie", "Reel", "Edor"),
            row(4, 2, "The Butterfly", "slip jig", "Em"),
            row(5, 3, "Sí Bheag Sí Mhór", "waltz", "D"),
        ])
    }

    fn ids(rows: Vec<&TuneRow>) -> Vec<i64> {
        rows.into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_by_book_exact_match() {
        let table = sample_table();
        assert_eq!(ids(table.by_book(2)), vec![3, 4]);
        assert!(table.by_book(9).is_empty());
    }

    #[test]
    fn test_by_type_case_insensitive_substring() {
        let table = sample_table();
        assert_eq!(ids(table.by_type("REEL")), vec![2, 3]);
        // "jig" also matches "slip jig"
        assert_eq!(ids(table.by_type("jig")), vec![1, 4]);
        assert!(table.by_type("hornpipe").is_empty());
    }

    #[test]
    fn test_search_title() {
        let table = sample_table();
        assert_eq!(ids(table.search_title("the")), vec![1, 2, 4]);
        assert_eq!(ids(table.search_title("MAGGIE")), vec![3]);
        assert_eq!(ids(table.search_title("sí bheag")), vec![5]);
    }

    #[test]
    fn test_empty_term_matches_all_non_null() {
        let mut rows = sample_table().all().to_vec();
        rows[0].title = None;
        let table = TuneTable::new(rows);

        assert_eq!(ids(table.search_title("")), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_stats() {
        let stats = sample_table().stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.books, 3);
        // Type counts are case-sensitive, like the stored values
        assert_eq!(
            stats.by_type,
            vec![
                ("Reel".to_string(), 1),
                ("jig".to_string(), 1),
                ("reel".to_string(), 1),
                ("slip jig".to_string(), 1),
                ("waltz".to_string(), 1),
            ]
        );
        assert_eq!(stats.by_key[0], ("D".to_string(), 2));
    }

    #[test]
    fn test_stats_empty_table() {
        let stats = TuneTable::default().stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.books, 0);
        assert!(stats.by_type.is_empty());
        assert!(stats.by_key.is_empty());
    }
}
