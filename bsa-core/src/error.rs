/// Error types for the Portal BSA library
use thiserror::Error;

/// Main error type for record and aggregate operations
#[derive(Error, Debug)]
pub enum BsaError {
    /// Malformed or missing input field
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Operation targeted a record id absent from the store
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Any failure of the underlying store
    #[error("Backing store error: {0}")]
    BackingStore(#[from] rusqlite::Error),

    /// Failed to parse CSV data during bulk import
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Type alias for Results using BsaError
pub type Result<T> = std::result::Result<T, BsaError>;
