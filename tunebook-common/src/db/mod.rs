//! Database setup and `tunes` table queries

pub mod init;
pub mod models;
pub mod tunes;

pub use init::*;
pub use models::*;
pub use tunes::*;
