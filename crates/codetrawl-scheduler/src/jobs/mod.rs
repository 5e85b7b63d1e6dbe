//! Scheduled jobs for the indexing engine.

pub mod indexing;
pub mod reindex;

pub use indexing::{create_indexing_job, run_indexing_job, IndexingJobConfig};
pub use reindex::{create_reindex_job, run_reindex_job, ReindexJobConfig};
