//! Queue-drain indexing job.
//!
//! Each tick consults the backpressure gate; when clear, it drains one
//! bounded batch into the content index and one into the time index.
//! Failures are logged and the schedule continues — retry is simply the
//! next tick.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use codetrawl_index::{BackpressureGate, BatchOutcome, CodeIndexer, DocumentQueue};

use crate::{SchedulerError, SchedulerService};

/// Configuration for the indexing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingJobConfig {
    /// Cron expression (default: "0 * * * * *" = every minute)
    pub cron: String,

    /// Timezone override; service default when absent
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for IndexingJobConfig {
    fn default() -> Self {
        Self {
            cron: "0 * * * * *".to_string(),
            timezone: None,
        }
    }
}

impl IndexingJobConfig {
    pub fn with_cron(mut self, cron: impl Into<String>) -> Self {
        self.cron = cron.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Register the queue-drain indexing job with the scheduler.
pub async fn create_indexing_job(
    scheduler: &SchedulerService,
    gate: Arc<BackpressureGate>,
    indexer: Arc<CodeIndexer>,
    content_queue: Arc<DocumentQueue>,
    time_queue: Arc<DocumentQueue>,
    config: IndexingJobConfig,
) -> Result<(), SchedulerError> {
    scheduler
        .register_job(
            "index_documents",
            &config.cron,
            config.timezone.as_deref(),
            move || {
                let gate = Arc::clone(&gate);
                let indexer = Arc::clone(&indexer);
                let content_queue = Arc::clone(&content_queue);
                let time_queue = Arc::clone(&time_queue);
                async move { run_indexing_job(gate, indexer, content_queue, time_queue).await }
            },
        )
        .await?;

    info!("Registered queue-drain indexing job");
    Ok(())
}

/// Execute one indexing tick.
///
/// Never returns an error: a tripped gate skips the tick and index
/// failures are logged so the scheduler always reaches its next tick.
pub async fn run_indexing_job(
    gate: Arc<BackpressureGate>,
    indexer: Arc<CodeIndexer>,
    content_queue: Arc<DocumentQueue>,
    time_queue: Arc<DocumentQueue>,
) -> Result<(), String> {
    if gate.should_pause_adding() {
        debug!("Ingestion paused, skipping indexing tick");
        return Ok(());
    }

    report("content", indexer.index_documents(&content_queue));
    report("time", indexer.index_time_documents(&time_queue));

    Ok(())
}

fn report(flavor: &str, result: Result<BatchOutcome, codetrawl_index::IndexError>) {
    match result {
        Ok(outcome) if outcome.drained > 0 => {
            info!(
                flavor,
                indexed = outcome.indexed,
                failed = outcome.failed,
                "Index batch complete"
            );
        }
        Ok(_) => debug!(flavor, "No documents queued"),
        Err(e) => warn!(flavor, error = %e, "Index batch failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetrawl_index::{IndexConfig, ProcLoadAverage, QueueAccounting};
    use codetrawl_types::{CodeDocument, Settings};
    use tempfile::TempDir;

    fn indexer(temp: &TempDir) -> Arc<CodeIndexer> {
        let config = IndexConfig::new(temp.path().join("content"), temp.path().join("time"));
        Arc::new(CodeIndexer::new(config).with_minimal_path(temp.path().join("minimal")))
    }

    fn gate(accounting: Arc<QueueAccounting>) -> Arc<BackpressureGate> {
        Arc::new(BackpressureGate::new(
            Arc::new(Settings::default()),
            Arc::new(ProcLoadAverage),
            accounting,
        ))
    }

    fn doc(path: &str) -> CodeDocument {
        CodeDocument::new(path, "acme", "f.rs", "src", "src/f.rs")
            .with_language_name("Rust")
            .with_code_lines(3)
            .with_contents("fn f() {}")
            .with_revision("rev-1")
    }

    #[tokio::test]
    async fn test_run_drains_both_queues() {
        let temp = TempDir::new().unwrap();
        let content_queue = Arc::new(DocumentQueue::new());
        let time_queue = Arc::new(DocumentQueue::new());
        content_queue.enqueue(doc("./repo/acme/a.rs"));
        time_queue.enqueue(doc("./repo/acme/a.rs"));

        run_indexing_job(
            gate(content_queue.accounting()),
            indexer(&temp),
            Arc::clone(&content_queue),
            Arc::clone(&time_queue),
        )
        .await
        .unwrap();

        assert!(content_queue.is_empty());
        assert!(time_queue.is_empty());
    }

    #[tokio::test]
    async fn test_run_skips_when_gate_tripped() {
        let temp = TempDir::new().unwrap();
        let content_queue = Arc::new(DocumentQueue::new());
        let time_queue = Arc::new(DocumentQueue::new());
        content_queue.enqueue(doc("./repo/acme/a.rs"));

        let gate = gate(content_queue.accounting());
        gate.pause();

        run_indexing_job(
            Arc::clone(&gate),
            indexer(&temp),
            Arc::clone(&content_queue),
            Arc::clone(&time_queue),
        )
        .await
        .unwrap();

        // Nothing drained while paused
        assert_eq!(content_queue.len(), 1);
    }

    #[test]
    fn test_config_defaults_and_builders() {
        let config = IndexingJobConfig::default();
        assert_eq!(config.cron, "0 * * * * *");
        assert!(config.timezone.is_none());

        let config = config.with_cron("0 */5 * * * *").with_timezone("UTC");
        assert_eq!(config.cron, "0 */5 * * * *");
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = IndexingJobConfig::default().with_cron("0 0 * * * *");
        let json = serde_json::to_string(&config).unwrap();
        let decoded: IndexingJobConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.cron, "0 0 * * * *");
    }
}
