//! Pending index document.
//!
//! A `CodeDocument` is produced by the crawler/parser for every source
//! file and consumed exactly once by the indexing pipeline. The composite
//! path acts as the primary key for the content index; the time index
//! keys on path plus revision.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A parsed source file waiting to be indexed.
///
/// The identity fields are set at construction; everything else is
/// attached with the fluent `with_*` builders. The time-index fields
/// (`revision`, `year_month_day`, `message`, `deleted`) stay empty for
/// documents that only target the content index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeDocument {
    /// Primary key: repo location + repo name + file location + file name.
    /// Doubled path separators are collapsed at construction.
    pub path: String,

    /// Repository this file belongs to
    pub repo_name: String,

    /// File name including extension
    pub file_name: String,

    /// Path to the file relative to the repository root
    pub file_location: String,

    /// File location joined with the file name
    pub file_location_filename: String,

    /// MD5 of the raw contents, computed by the producer
    pub md5_hash: String,

    /// Detected language name
    pub language_name: String,

    /// Number of code lines, used for queue accounting
    pub code_lines: u64,

    /// Raw file contents
    pub contents: String,

    /// Remote location of the repository (clone URL)
    pub repo_remote_location: String,

    /// Code owner derived from commit history
    pub code_owner: String,

    /// Revision/commit id (time index only)
    pub revision: String,

    /// Commit date as `YYYYMMDD` (time index only)
    pub year_month_day: String,

    /// Commit message (time index only)
    pub message: String,

    /// Deletion marker for the time filter, e.g. "TRUE" (time index only)
    pub deleted: String,

    /// Deterministic content hash used for dedup by the producer.
    /// Defaults to empty so indexing never trips on a missing value.
    pub content_hash: String,

    /// Path to present in the UI, which may differ from the index key
    pub display_location: String,

    /// Origin system name
    pub source: String,
}

impl CodeDocument {
    /// Create a document from its primary-key components.
    pub fn new(
        path: impl Into<String>,
        repo_name: impl Into<String>,
        file_name: impl Into<String>,
        file_location: impl Into<String>,
        file_location_filename: impl Into<String>,
    ) -> Self {
        Self {
            path: normalize_path(&path.into()),
            repo_name: repo_name.into(),
            file_name: file_name.into(),
            file_location: file_location.into(),
            file_location_filename: file_location_filename.into(),
            ..Self::default()
        }
    }

    /// Replace the primary key, collapsing doubled separators.
    pub fn set_path(&mut self, path: &str) {
        self.path = normalize_path(path);
    }

    pub fn with_md5_hash(mut self, md5_hash: impl Into<String>) -> Self {
        self.md5_hash = md5_hash.into();
        self
    }

    pub fn with_language_name(mut self, language_name: impl Into<String>) -> Self {
        self.language_name = language_name.into();
        self
    }

    pub fn with_code_lines(mut self, code_lines: u64) -> Self {
        self.code_lines = code_lines;
        self
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn with_repo_remote_location(mut self, location: impl Into<String>) -> Self {
        self.repo_remote_location = location.into();
        self
    }

    pub fn with_code_owner(mut self, code_owner: impl Into<String>) -> Self {
        self.code_owner = code_owner.into();
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_year_month_day(mut self, year_month_day: impl Into<String>) -> Self {
        self.year_month_day = year_month_day.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_deleted(mut self, deleted: impl Into<String>) -> Self {
        self.deleted = deleted.into();
        self
    }

    pub fn with_content_hash(mut self, content_hash: impl Into<String>) -> Self {
        self.content_hash = content_hash.into();
        self
    }

    pub fn with_display_location(mut self, display_location: impl Into<String>) -> Self {
        self.display_location = display_location.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Stable digest of the primary key.
    ///
    /// Used as a secondary correlation id for this file in the index,
    /// never as the storage key.
    pub fn path_digest(&self) -> String {
        hex::encode(Sha256::digest(self.path.as_bytes()))
    }

    /// Year-month truncation (`YYYYMM`) of the commit date.
    pub fn year_month(&self) -> &str {
        truncate_ascii(&self.year_month_day, 6)
    }

    /// Year truncation (`YYYY`) of the commit date.
    pub fn year(&self) -> &str {
        truncate_ascii(&self.year_month_day, 4)
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Collapse doubled `/` separators until none remain.
fn normalize_path(path: &str) -> String {
    let mut normalized = path.to_string();
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

fn truncate_ascii(value: &str, len: usize) -> &str {
    if value.len() >= len && value.is_char_boundary(len) {
        &value[..len]
    } else {
        value
    }
}
