//! Full-table reindex job for the minimal index.
//!
//! Pulls every row from the relational source and re-indexes each one
//! unconditionally — a full scan, no incremental diffing. Upstream read
//! failures are logged and the job waits for its next tick; there is no
//! transactional guarantee across the store and the index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use codetrawl_index::{BackpressureGate, CodeIndexer};
use codetrawl_types::CodeStore;

use crate::{SchedulerError, SchedulerService};

/// Configuration for the full-table reindex job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexJobConfig {
    /// Cron expression (default: "0 0 3 * * *" = daily at 03:00)
    pub cron: String,

    /// Timezone override; service default when absent
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for ReindexJobConfig {
    fn default() -> Self {
        Self {
            cron: "0 0 3 * * *".to_string(),
            timezone: None,
        }
    }
}

impl ReindexJobConfig {
    pub fn with_cron(mut self, cron: impl Into<String>) -> Self {
        self.cron = cron.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Register the full-table reindex job with the scheduler.
pub async fn create_reindex_job(
    scheduler: &SchedulerService,
    gate: Arc<BackpressureGate>,
    store: Arc<dyn CodeStore>,
    indexer: Arc<CodeIndexer>,
    config: ReindexJobConfig,
) -> Result<(), SchedulerError> {
    scheduler
        .register_job(
            "reindex_code",
            &config.cron,
            config.timezone.as_deref(),
            move || {
                let gate = Arc::clone(&gate);
                let store = Arc::clone(&store);
                let indexer = Arc::clone(&indexer);
                async move { run_reindex_job(gate, store, indexer).await }
            },
        )
        .await?;

    info!("Registered full-table reindex job");
    Ok(())
}

/// Execute one reindex tick.
///
/// Never returns an error: every failure is logged and the scheduler
/// proceeds to its next tick.
pub async fn run_reindex_job(
    gate: Arc<BackpressureGate>,
    store: Arc<dyn CodeStore>,
    indexer: Arc<CodeIndexer>,
) -> Result<(), String> {
    if gate.is_paused() {
        debug!("Background jobs paused, skipping reindex tick");
        return Ok(());
    }

    let rows = match store.fetch_all() {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "Failed to fetch code rows, will retry next tick");
            return Ok(());
        }
    };

    info!(count = rows.len(), "Reindexing code rows");

    for row in &rows {
        info!(id = row.id, location = %row.location, "Reindexing row");
        if let Err(e) = indexer.index_code_row(row) {
            warn!(id = row.id, error = %e, "Failed to index code row");
        }
    }

    Ok(())
}
