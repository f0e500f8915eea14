//! Ingest services
//!
//! - `book_walker`: finds numbered book folders and parses their `.abc` files
//! - `loader`: writes walked books into the `tunes` table

pub mod book_walker;
pub mod loader;

pub use book_walker::{walk, BookFile, BookWalker, WalkError, WalkOutcome};
pub use loader::{load_books, reload_books, store_outcome, LoadSummary};
