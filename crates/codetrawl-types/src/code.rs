//! Relational source rows for the secondary minimal index.
//!
//! The full-table reindex job pulls every row from an external relational
//! store and re-indexes it unconditionally. The store itself is outside
//! this system; only the row shape and the fetch contract live here.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// One row of the external code table, already decompressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRow {
    /// Numeric primary key in the relational store
    pub id: i64,

    /// Source location of the file
    pub location: String,

    /// Decompressed file contents
    pub content: String,
}

impl CodeRow {
    pub fn new(id: i64, location: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            location: location.into(),
            content: content.into(),
        }
    }
}

/// Contract for fetching all rows from the relational source.
///
/// Implementations wrap whatever connection pool the host application
/// uses. Errors surface as `TypesError::Store` and the reindex job logs
/// and continues.
pub trait CodeStore: Send + Sync {
    /// Fetch every row of the code table.
    fn fetch_all(&self) -> Result<Vec<CodeRow>, TypesError>;
}
