//! Error types for listiq
//!
//! Arithmetic in `mortgage`, `compare` and `sort` has no error path; everything
//! here belongs to validation and the I/O boundary.

use thiserror::Error;

/// Main error type for the listiq library
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or out-of-range input, rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown property or saved search
    #[error("Not found: {0}")]
    NotFound(String),

    /// A saved search with this name exists and overwrite was not confirmed
    #[error("A saved search named \"{0}\" already exists")]
    SearchNameTaken(String),

    /// Malformed shared-search payload
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// Nothing to summarize
    #[error("No recent articles found to summarize")]
    NoArticles,

    /// AI provider failure or unusable response
    #[error("AI error: {0}")]
    Ai(String),

    /// Persistence failures
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience Result type using the listiq Error
pub type Result<T> = std::result::Result<T, Error>;
