//! Error types for configuration discovery, loading and mutation.
//!
//! Responsibilities:
//! - Define error variants for root discovery, `.env` loading, source
//!   evaluation and fail-fast mutation.
//!
//! Does NOT handle:
//! - Read failures (`get`/`has` resolve to the caller's default instead).
//!
//! Invariants:
//! - All error variants include context for debugging (keys, paths, etc.).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or mutating a configuration store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Project root not found: no marker within {max_depth} parent directories of {}",
        .start.display()
    )]
    RootNotFound { start: PathBuf, max_depth: usize },

    #[error("Unable to determine search start directory: {0}")]
    StartDirUnavailable(String),

    #[error("Environment file not found at {}", .path.display())]
    EnvFileNotFound { path: PathBuf },

    /// Failed to load the `.env` file.
    ///
    /// SAFETY: `message` carries a byte position or an I/O error kind, never
    /// the offending line content.
    #[error("Failed to load environment file {}: {message}", .path.display())]
    EnvFileLoad { path: PathBuf, message: String },

    #[error("Configuration key '{0}' not found")]
    KeyNotFound(String),

    #[error("Cannot write '{key}': value at '{segment}' is not a mapping")]
    NotTraversable { key: String, segment: String },

    #[error("Configuration key '{key}' has an unexpected shape: {message}")]
    Conversion { key: String, message: String },

    #[error("Failed to read configuration source at {}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration source at {}: {message}", .path.display())]
    SourceParse { path: PathBuf, message: String },

    #[error("Failed to walk configuration directory {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },
}

impl From<walkdir::Error> for ConfigError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(PathBuf::from).unwrap_or_default();
        ConfigError::Walk {
            path,
            message: error.to_string(),
        }
    }
}
