//! The index writer pipeline.
//!
//! Single entry point for every mutation of the on-disk indexes: batch
//! writes for the content and time flavors, targeted deletions, and the
//! minimal secondary index. All of them serialize on one write lock
//! because the underlying engine defines no concurrent-writer semantics;
//! readers are isolated by segment commits and never wait on this lock.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tantivy::query::QueryParser;
use tantivy::{IndexWriter, Term};
use tracing::{info, warn};

use codetrawl_analysis::{
    code_clean_pipeline, find_interesting_keywords, split_keywords, SpellingCorrector,
};
use codetrawl_types::{CodeDocument, CodeRow};

use crate::document::minimal_document;
use crate::error::IndexError;
use crate::index::{open_or_create_index, IndexConfig};
use crate::queue::DocumentQueue;
use crate::schema::{ContentSchema, MinimalSchema, SchemaFlavor, TimeSchema};

/// Most documents a single pipeline invocation will drain.
///
/// Anything beyond this stays queued for the next scheduled tick.
pub const MAX_BATCH_SIZE: usize = 1000;

/// The minimal index lives at a fixed location, keyed by row id.
const MINIMAL_INDEX_DIR: &str = "./index/code";

/// What one batch invocation did.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchOutcome {
    /// Documents removed from the queue
    pub drained: usize,
    /// Documents written to the index
    pub indexed: usize,
    /// Documents that failed to convert or write
    pub failed: usize,
}

impl BatchOutcome {
    pub fn has_updates(&self) -> bool {
        self.indexed > 0
    }
}

/// Coordinates every mutation of the content, time, and minimal indexes.
///
/// Owns the single logical write lock. Cheap to share behind an `Arc`;
/// the backpressure gate is deliberately separate so admission checks
/// never touch this lock.
pub struct CodeIndexer {
    config: IndexConfig,
    corrector: Arc<SpellingCorrector>,
    write_lock: Mutex<()>,
    minimal_path: PathBuf,
}

impl CodeIndexer {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            corrector: Arc::new(SpellingCorrector::new()),
            write_lock: Mutex::new(()),
            minimal_path: PathBuf::from(MINIMAL_INDEX_DIR),
        }
    }

    /// Share a spelling corrector with the rest of the system.
    pub fn with_corrector(mut self, corrector: Arc<SpellingCorrector>) -> Self {
        self.corrector = corrector;
        self
    }

    pub fn corrector(&self) -> Arc<SpellingCorrector> {
        Arc::clone(&self.corrector)
    }

    /// Relocate the minimal index.
    ///
    /// The engine-fixed location is the default; this is not an operator
    /// setting and exists for tests and embedded callers.
    pub fn with_minimal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.minimal_path = path.into();
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, IndexError> {
        self.write_lock
            .lock()
            .map_err(|e| IndexError::Locked(e.to_string()))
    }

    /// Drain up to [`MAX_BATCH_SIZE`] documents into the content index.
    pub fn index_documents(&self, queue: &DocumentQueue) -> Result<BatchOutcome, IndexError> {
        self.index_batch::<ContentSchema>(queue, &self.config.content_path)
    }

    /// Drain up to [`MAX_BATCH_SIZE`] documents into the time index.
    pub fn index_time_documents(&self, queue: &DocumentQueue) -> Result<BatchOutcome, IndexError> {
        self.index_batch::<TimeSchema>(queue, &self.config.time_path)
    }

    /// Index a single document into the content index.
    ///
    /// Wraps the document in a one-element batch; useful for low-memory
    /// or single-event callers.
    pub fn index_document(&self, doc: CodeDocument) -> Result<BatchOutcome, IndexError> {
        let queue = DocumentQueue::new();
        queue.enqueue(doc);
        self.index_documents(&queue)
    }

    /// Index a single document into the time index.
    pub fn index_time_document(&self, doc: CodeDocument) -> Result<BatchOutcome, IndexError> {
        let queue = DocumentQueue::new();
        queue.enqueue(doc);
        self.index_time_documents(&queue)
    }

    /// Shared batch engine for the content and time flavors.
    ///
    /// The writer is released unconditionally: per-document failures are
    /// counted and logged, and whatever was applied is committed before
    /// this returns. Only storage errors propagate.
    fn index_batch<S: SchemaFlavor>(
        &self,
        queue: &DocumentQueue,
        path: &Path,
    ) -> Result<BatchOutcome, IndexError> {
        let _guard = self.lock()?;

        let index = open_or_create_index(path, S::build())?;
        let schema = S::from_schema(index.schema())?;
        let mut writer: IndexWriter = index.writer(self.config.writer_memory_bytes())?;

        let accounting = queue.accounting();
        let batch = queue.drain(MAX_BATCH_SIZE);
        let mut outcome = BatchOutcome {
            drained: batch.len(),
            ..Default::default()
        };

        for doc in &batch {
            // Settle the line counter before any fallible work so a bad
            // document cannot leave it permanently high.
            accounting.decrement_lines(doc.code_lines);

            self.corrector.add_text(&doc.contents);

            let body = schema.searchable_body(doc);
            let entry = schema.build_document(doc, &body, current_millis());
            let key = schema.primary_key(doc);

            writer.delete_term(Term::from_field_text(schema.primary_key_field(), &key));
            match writer.add_document(entry) {
                Ok(_) => {
                    info!(flavor = schema.name(), path = %doc.path, "Indexing file");
                    outcome.indexed += 1;
                }
                Err(e) => {
                    warn!(
                        flavor = schema.name(),
                        path = %doc.path,
                        error = %e,
                        "Failed to index document"
                    );
                    outcome.failed += 1;
                }
            }
        }

        let commit = writer.commit();
        info!(
            flavor = schema.name(),
            indexed = outcome.indexed,
            failed = outcome.failed,
            "Closing index writer"
        );
        commit?;

        Ok(outcome)
    }

    /// Delete every content-index entry belonging to a repository.
    pub fn delete_by_repo_name(&self, repo_name: &str) -> Result<(), IndexError> {
        let _guard = self.lock()?;

        let index = open_or_create_index(&self.config.content_path, ContentSchema::build())?;
        let schema = ContentSchema::from_schema(index.schema())?;
        let mut writer: IndexWriter = index.writer(self.config.writer_memory_bytes())?;

        writer.delete_term(Term::from_field_text(schema.repo_name_raw, repo_name));
        writer.commit()?;

        info!(repo_name, "Deleted repository from content index");
        Ok(())
    }

    /// Delete content-index entries matching a file location + filename.
    ///
    /// The path is quoted so query metacharacters match literally. A
    /// query that fails to parse or execute makes this a logged no-op;
    /// only opening or committing the writer can error.
    pub fn delete_by_file_location_filename(&self, path: &str) -> Result<(), IndexError> {
        let _guard = self.lock()?;

        let index = open_or_create_index(&self.config.content_path, ContentSchema::build())?;
        let schema = ContentSchema::from_schema(index.schema())?;
        let mut writer: IndexWriter = index.writer(self.config.writer_memory_bytes())?;

        let parser = QueryParser::for_index(&index, vec![schema.file_location_filename]);
        match parser.parse_query(&escape_query_literal(path)) {
            Ok(query) => {
                if let Err(e) = writer.delete_query(query) {
                    warn!(path, error = %e, "Failed to delete by file location");
                }
            }
            Err(e) => {
                warn!(path, error = %e, "Failed to parse file location deletion query");
            }
        }

        writer.commit()?;
        info!(path, "Closed content index writer after path deletion");
        Ok(())
    }

    /// Upsert one relational row into the minimal index.
    ///
    /// Only the processed text is indexed; no facets, no metadata.
    pub fn index_code_row(&self, row: &CodeRow) -> Result<(), IndexError> {
        let _guard = self.lock()?;

        let index = open_or_create_index(&self.minimal_path, MinimalSchema::build())?;
        let schema = MinimalSchema::from_schema(index.schema())?;
        let mut writer: IndexWriter = index.writer(self.config.writer_memory_bytes())?;

        let body = [
            split_keywords(&row.content),
            code_clean_pipeline(&row.content),
            find_interesting_keywords(&row.content),
        ]
        .join(" ")
        .to_lowercase();

        let entry = minimal_document(&schema, row.id, &body);
        writer.delete_term(Term::from_field_text(schema.id, &row.id.to_string()));
        writer.add_document(entry)?;
        writer.commit()?;

        info!(id = row.id, location = %row.location, "Indexed code row");
        Ok(())
    }
}

/// Quote a path so the query parser treats its metacharacters literally.
fn escape_query_literal(path: &str) -> String {
    let sanitized: String = path
        .chars()
        .map(|ch| if ch == '"' || ch == '\\' { ' ' } else { ch })
        .collect();
    format!("\"{sanitized}\"")
}

fn current_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
