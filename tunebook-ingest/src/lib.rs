//! tunebook-ingest library interface
//!
//! Exposes the ABC parser and the book walker/loader for the binary and for
//! integration testing.

pub mod abc;
pub mod services;

pub use abc::{parse_bytes, parse_lines, parse_str, TuneParser};
pub use services::{BookWalker, LoadSummary, WalkOutcome};
