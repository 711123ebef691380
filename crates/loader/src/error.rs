use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a CSV file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The CSV file does not exist.
    #[error("csv file not found: {0}")]
    NotFound(PathBuf),

    /// The file could not be read or is not valid CSV.
    #[error("csv read error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more rows were malformed. The whole load is rejected.
    #[error("malformed csv: line {line}: {reason} ({processed} rows parsed, {failed} failed)")]
    DataIntegrity {
        line: usize,
        reason: String,
        processed: usize,
        failed: usize,
    },

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] store::StoreError),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoadError>;
