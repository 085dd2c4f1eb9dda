//! Error types for pixabay-sampler
//!
//! The engine deliberately keeps its fallible surface small: transport-level
//! failures are absorbed inside the fetch primitive (see [`crate::client`]),
//! and quota shortfalls are soft outcomes rather than errors. What remains
//! here are the conditions that genuinely abort a sampling run — a population
//! that cannot be split proportionally, and persistence failures.

use thiserror::Error;

/// Result type alias for pixabay-sampler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pixabay-sampler
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.key")
        key: Option<String>,
    },

    /// The population probe found zero images across every requested color.
    ///
    /// There is no meaningful proportional split of an empty population, so
    /// this aborts the run instead of attempting a partial computation.
    #[error("total image population across all colors is zero; cannot compute quotas")]
    EmptyPopulation,

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A record violated a schema-level expectation (e.g. tag count)
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_include_context() {
        let err = Error::Config {
            message: "missing API key".to_string(),
            key: Some("api.key".to_string()),
        };
        assert_eq!(err.to_string(), "configuration error: missing API key");

        let err = Error::Database(DatabaseError::InvalidRecord(
            "expected 3 tags, got 2".to_string(),
        ));
        assert!(err.to_string().contains("expected 3 tags"));
    }

    #[test]
    fn empty_population_message_names_the_condition() {
        let err = Error::EmptyPopulation;
        assert!(err.to_string().contains("zero"));
    }
}
