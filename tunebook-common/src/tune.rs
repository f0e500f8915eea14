//! Parsed tune records
//!
//! A [`TuneRecord`] is what the ABC parser produces for one `X:` block. Header
//! fields that were absent stay `None`; presentation defaults ("Unknown") are
//! applied only when a record is written to the database, see
//! [`crate::config::TuneDefaults`].

use serde::{Deserialize, Serialize};

/// One musical piece extracted from an ABC file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TuneRecord {
    /// Text after the `X:` marker, trimmed (not necessarily numeric)
    pub sequence_id: String,
    /// `T:` field
    pub title: Option<String>,
    /// `R:` field (rhythm, e.g. jig or reel)
    pub tune_type: Option<String>,
    /// `K:` field
    pub key: Option<String>,
    /// `M:` field
    pub meter: Option<String>,
    /// Every line of the record in original order, terminators included
    pub raw_body: String,
}

/// A tune tagged with the number of the book directory it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTune {
    pub book_number: i64,
    pub tune: TuneRecord,
}
