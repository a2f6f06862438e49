//! Error types for Lineage Core

use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias using Lineage's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Lineage error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    #[error("Person already exists: {0}")]
    PersonExists(String),

    #[error("Invalid tree name: {0}")]
    InvalidTreeName(String),

    #[error(transparent)]
    Limit(#[from] LimitError),

    #[error("Import error at line {line}: {message}")]
    Import { line: usize, message: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
