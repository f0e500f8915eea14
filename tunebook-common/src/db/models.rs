//! Database models

use serde::{Deserialize, Serialize};

/// One row of the `tunes` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TuneRow {
    pub id: i64,
    pub book_number: i64,
    pub title: Option<String>,
    pub tune_type: Option<String>,
    pub key: Option<String>,
    pub meter: Option<String>,
    pub raw_abc: Option<String>,
}

/// Columns of the `tunes` table that can be grouped and counted
///
/// Column names never come from user input; this enum is the whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuneColumn {
    TuneType,
    Key,
    Meter,
}

impl TuneColumn {
    /// SQL column name
    pub fn as_str(self) -> &'static str {
        match self {
            TuneColumn::TuneType => "tune_type",
            TuneColumn::Key => "key",
            TuneColumn::Meter => "meter",
        }
    }
}
