//! # codetrawl-index
//!
//! The write path of the codetrawl search engine, built on tantivy.
//!
//! Parsed source files arrive on a [`DocumentQueue`]; the
//! [`BackpressureGate`] tells producers when to stop; [`CodeIndexer`]
//! drains bounded batches into the content and time indexes, handles
//! targeted deletions, and feeds the minimal secondary index. Every
//! mutating operation serializes on one write lock, while readers rely
//! on tantivy's segment commits for isolation.
//!
//! ## Index flavors
//!
//! - **Content**: one live entry per file path, upserted by path
//! - **Time**: one entry per (path, revision) pair with commit metadata
//!   and date facets
//! - **Minimal**: numeric-id-keyed processed text, no facets

pub mod backpressure;
pub mod document;
pub mod error;
pub mod index;
pub mod indexer;
pub mod queue;
pub mod schema;

pub use backpressure::{BackpressureGate, ProcLoadAverage, SystemStats};
pub use document::{content_document, minimal_document, time_document};
pub use error::IndexError;
pub use index::{open_or_create_index, IndexConfig, DEFAULT_WRITER_MEMORY_MB};
pub use indexer::{BatchOutcome, CodeIndexer, MAX_BATCH_SIZE};
pub use queue::{DocumentQueue, QueueAccounting};
pub use schema::{ContentSchema, MinimalSchema, SchemaFlavor, TimeSchema};
