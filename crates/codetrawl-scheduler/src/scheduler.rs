//! Scheduler service wrapper around tokio-cron-scheduler.
//!
//! Jobs registered here run on a continue-at-all-costs policy: a failing
//! run is logged and the next tick fires regardless. Overlapping ticks of
//! the same job are skipped rather than queued.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{SchedulerConfig, SchedulerError};

/// Validate a cron expression.
///
/// Expressions use the 6-field format: second minute hour day-of-month
/// month day-of-week.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidCron` for unparseable expressions.
pub fn validate_cron_expression(expr: &str) -> Result<(), SchedulerError> {
    match Job::new_async(expr, |_uuid, _lock| Box::pin(async {})) {
        Ok(_) => Ok(()),
        Err(e) => Err(SchedulerError::InvalidCron(format!("'{}': {}", expr, e))),
    }
}

/// Lifecycle wrapper for the background job scheduler.
pub struct SchedulerService {
    scheduler: JobScheduler,
    config: SchedulerConfig,
    shutdown_token: CancellationToken,
    is_running: AtomicBool,
}

impl SchedulerService {
    /// Create a stopped scheduler service.
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        // Fail fast on a bad timezone before any job registers
        let _ = config.parse_timezone()?;

        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            config,
            shutdown_token: CancellationToken::new(),
            is_running: AtomicBool::new(false),
        })
    }

    /// Register a job under the given name and cron expression.
    ///
    /// The job's timezone defaults to the service-wide one. A tick that
    /// fires while the previous run is still active logs a skip and does
    /// nothing; a run that returns an error is logged and the schedule
    /// continues.
    pub async fn register_job<F, Fut>(
        &self,
        name: &'static str,
        cron: &str,
        timezone: Option<&str>,
        run: F,
    ) -> Result<uuid::Uuid, SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let tz: Tz = match timezone {
            Some(tz) => tz
                .parse()
                .map_err(|_| SchedulerError::InvalidTimezone(tz.to_string()))?,
            None => self.config.parse_timezone()?,
        };

        let busy = Arc::new(AtomicBool::new(false));
        let job = Job::new_async_tz(cron, tz, move |_uuid, _lock| {
            let run = run.clone();
            let busy = Arc::clone(&busy);
            Box::pin(async move {
                if busy.swap(true, Ordering::SeqCst) {
                    warn!(job = name, "Previous run still active, skipping tick");
                    return;
                }
                if let Err(e) = run().await {
                    warn!(job = name, error = %e, "Job run failed");
                }
                busy.store(false, Ordering::SeqCst);
            })
        })
        .map_err(|e| SchedulerError::InvalidCron(format!("'{}': {}", cron, e)))?;

        let id = self.scheduler.add(job).await?;
        info!(job = name, cron, "Registered job");
        Ok(id)
    }

    /// Start executing registered jobs.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.scheduler.start().await?;
        info!("Scheduler started");
        Ok(())
    }

    /// Shut down gracefully: signal jobs, wait, stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        if !self.is_running.load(Ordering::SeqCst) {
            return Err(SchedulerError::NotRunning);
        }

        info!("Initiating scheduler shutdown");
        self.shutdown_token.cancel();

        tokio::time::sleep(std::time::Duration::from_secs(
            self.config.shutdown_timeout_secs.min(5),
        ))
        .await;

        if let Err(e) = self.scheduler.shutdown().await {
            warn!("Error during scheduler shutdown: {}", e);
        }

        self.is_running.store(false, Ordering::SeqCst);
        info!("Scheduler shutdown complete");
        Ok(())
    }

    /// Token jobs can watch to exit cleanly on shutdown.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }
}
