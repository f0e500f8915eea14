//! tunebook-query library - console query shell over the tunes table
//!
//! The table is read once per session ([`TuneTable::load`]) and every
//! filter runs in memory. Nothing here writes to the database.

pub mod render;
pub mod shell;
pub mod table;

pub use shell::{MenuChoice, QueryShell};
pub use table::{TableStats, TuneTable};
