use thiserror::Error;

/// Errors that can occur while running revenue queries.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
