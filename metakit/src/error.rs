//! Error types for metakit

use thiserror::Error;

/// Result type alias for metakit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a paginated query.
///
/// Normalization never fails. Everything here comes from executing the
/// query, decoding its rows, or loading configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// MySQL driver error
    #[cfg(feature = "mysql")]
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// SQLite / PostgreSQL driver error
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// The query context was cancelled before the query finished
    #[error("Query cancelled")]
    Cancelled,

    /// The query context deadline passed before the query finished
    #[error("Query deadline exceeded")]
    DeadlineExceeded,

    /// Type conversion error
    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: String,
    },

    /// Column not found in row
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Null value for non-optional field
    #[error("Unexpected null value for column: {0}")]
    UnexpectedNull(String),

    /// Sort field or direction rejected by an allow-list
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}
