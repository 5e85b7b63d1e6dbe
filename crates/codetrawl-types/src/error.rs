//! Error types shared across the codetrawl crates.

use thiserror::Error;

/// Unified error type for domain and configuration operations.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Relational store error
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
