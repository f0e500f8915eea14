//! Configuration loading and path resolution
//!
//! Each path is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default, relative to the working directory (fallback)
//!
//! A missing TOML file is not an error; every value has a default.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the books root folder
pub const BOOKS_ROOT_ENV: &str = "TUNEBOOK_BOOKS_ROOT";

/// Environment variable overriding the database file
pub const DATABASE_ENV: &str = "TUNEBOOK_DATABASE";

/// Compiled default books root
pub const DEFAULT_BOOKS_ROOT: &str = "abc_books";

/// Compiled default database file
pub const DEFAULT_DATABASE: &str = "tunes.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the numbered book directories
    #[serde(default)]
    pub books_root: Option<PathBuf>,

    /// SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Values written for header fields a tune does not have
    #[serde(default)]
    pub defaults: TuneDefaults,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Presentation defaults for absent header fields
///
/// The parser keeps missing fields as `None`; these strings are substituted
/// only when a tune is written to the database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TuneDefaults {
    pub title: String,
    pub tune_type: String,
    pub key: String,
    pub meter: String,
}

impl Default for TuneDefaults {
    fn default() -> Self {
        Self {
            title: "Unknown".to_string(),
            tune_type: "Unknown".to_string(),
            key: String::new(),
            meter: String::new(),
        }
    }
}

impl TomlConfig {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// tried and its absence falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    info!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Resolve the books root folder
    pub fn resolve_books_root(&self, cli_arg: Option<&Path>) -> PathBuf {
        resolve_path(
            cli_arg,
            BOOKS_ROOT_ENV,
            self.books_root.as_deref(),
            DEFAULT_BOOKS_ROOT,
        )
    }

    /// Resolve the database file
    pub fn resolve_database_path(&self, cli_arg: Option<&Path>) -> PathBuf {
        resolve_path(
            cli_arg,
            DATABASE_ENV,
            self.database_path.as_deref(),
            DEFAULT_DATABASE,
        )
    }
}

/// Per-user config file: `<config_dir>/tunebook/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunebook").join("config.toml"))
}

/// Resolve one path through the CLI > ENV > TOML > default chain
pub fn resolve_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
    default: &str,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    // Priority 4: Compiled default
    PathBuf::from(default)
}
