//! Index directory management.
//!
//! Each flavor lives in its own directory-backed store; the schema is
//! implicit in which fields a given upsert writes, so there is no
//! separate schema file beyond tantivy's own `meta.json`.

use std::path::{Path, PathBuf};

use tantivy::schema::Schema;
use tantivy::Index;
use tracing::{debug, info};

use codetrawl_types::Settings;

use crate::error::IndexError;

/// Default memory budget for an IndexWriter (50MB)
pub const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// Where the mutable indexes live.
///
/// The content and time paths come from settings; the minimal index
/// location is fixed by the engine (see `CodeIndexer`).
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Path to the content index directory
    pub content_path: PathBuf,
    /// Path to the time index directory
    pub time_path: PathBuf,
    /// Memory budget for writers in MB
    pub writer_memory_mb: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl IndexConfig {
    pub fn new(content_path: impl Into<PathBuf>, time_path: impl Into<PathBuf>) -> Self {
        Self {
            content_path: content_path.into(),
            time_path: time_path.into(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.index_location, &settings.time_index_location)
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }

    /// Writer memory budget in bytes.
    pub fn writer_memory_bytes(&self) -> usize {
        self.writer_memory_mb * 1024 * 1024
    }
}

/// Open an existing index or create a new one with the given schema.
///
/// Uses MmapDirectory for persistence; a directory counts as existing
/// when tantivy's `meta.json` is present.
pub fn open_or_create_index(path: &Path, schema: Schema) -> Result<Index, IndexError> {
    if path.join("meta.json").exists() {
        debug!(path = ?path, "Opening existing index");
        let index = Index::open_in_dir(path)?;
        Ok(index)
    } else {
        info!(path = ?path, "Creating new index");
        std::fs::create_dir_all(path)?;
        let index = Index::create_in_dir(path, schema)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentSchema, SchemaFlavor, TimeSchema};
    use tempfile::TempDir;

    #[test]
    fn test_create_then_reopen() {
        let temp_dir = TempDir::new().unwrap();

        let created = open_or_create_index(temp_dir.path(), ContentSchema::build()).unwrap();
        drop(created);
        assert!(temp_dir.path().join("meta.json").exists());

        let reopened = open_or_create_index(temp_dir.path(), ContentSchema::build()).unwrap();
        assert!(ContentSchema::from_schema(reopened.schema()).is_ok());
    }

    #[test]
    fn test_reopened_index_keeps_original_schema() {
        let temp_dir = TempDir::new().unwrap();

        let _time = open_or_create_index(temp_dir.path(), TimeSchema::build()).unwrap();
        // Reopening with a different requested schema returns the stored one
        let reopened = open_or_create_index(temp_dir.path(), ContentSchema::build()).unwrap();
        assert!(ContentSchema::from_schema(reopened.schema()).is_err());
        assert!(TimeSchema::from_schema(reopened.schema()).is_ok());
    }

    #[test]
    fn test_config_defaults() {
        let config = IndexConfig::default();
        assert_eq!(config.content_path, PathBuf::from("./index/content"));
        assert_eq!(config.time_path, PathBuf::from("./index/time"));
        assert_eq!(config.writer_memory_mb, DEFAULT_WRITER_MEMORY_MB);
    }

    #[test]
    fn test_config_with_memory() {
        let config = IndexConfig::new("/tmp/c", "/tmp/t").with_memory_mb(100);
        assert_eq!(config.writer_memory_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings {
            index_location: "/srv/content".to_string(),
            time_index_location: "/srv/time".to_string(),
            ..Default::default()
        };
        let config = IndexConfig::from_settings(&settings);
        assert_eq!(config.content_path, PathBuf::from("/srv/content"));
        assert_eq!(config.time_path, PathBuf::from("/srv/time"));
    }
}
