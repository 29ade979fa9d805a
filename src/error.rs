//! Error types for the fallible edges of the game
//!
//! The simulation itself never fails; only loading configuration and
//! collision shapes can.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure to produce a collision shape from a named asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset `{0}` not found")]
    Missing(String),
    #[error("asset `{name}` has an unusable shape: {reason}")]
    InvalidShape { name: String, reason: String },
}
