//! Error types for Scout operations

use thiserror::Error;

/// Scout Error types
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown fuzzy algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown filter type: {0}")]
    UnknownFilterType(String),

    #[error("Invalid threshold {0}: must be in the [0, 1] interval")]
    InvalidThreshold(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to spawn scan worker: {0}")]
    ScanSpawn(String),
}

/// Result type for Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

impl From<toml::de::Error> for ScoutError {
    fn from(e: toml::de::Error) -> Self {
        ScoutError::Config(e.to_string())
    }
}
