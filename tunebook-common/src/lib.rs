//! # Tunebook Common Library
//!
//! Shared code for the Tunebook binaries:
//! - Tune record model
//! - Database setup and `tunes` table queries
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod tune;

pub use error::{Error, Result};
pub use tune::{BookTune, TuneRecord};
