//! Error types for the artifact-viewer library.
//!
//! Only loading, configuration and conversion can fail. The text transforms
//! (`escape`, `latex`, `candidates`, `confidence`) are total and never return
//! these errors.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Convert error: {0}")]
    Convert(#[from] ConvertError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Top-level value is not an array of papers")]
    NotAnArray,

    #[error("No papers found in data")]
    Empty,
}

/// Errors that occur while reading viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(String),

    #[error("Unknown math backend: {0}")]
    UnknownMathBackend(String),
}

/// Errors that occur while converting CSV exports.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("JSON error: {0}")]
    Json(String),
}
