//! Error types for index operations.

use thiserror::Error;

/// Errors that can occur while mutating an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// Query parse error
    #[error("Query parse error: {0}")]
    QueryParse(#[from] tantivy::query::QueryParserError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Index directory exists but its schema is missing expected fields
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The write lock is poisoned
    #[error("Index write lock poisoned: {0}")]
    Locked(String),
}
