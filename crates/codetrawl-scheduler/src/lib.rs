//! # codetrawl-scheduler
//!
//! Background job scheduling for the codetrawl indexing engine, built on
//! `tokio-cron-scheduler` with timezone support and graceful shutdown.
//!
//! Two jobs ship with the engine:
//!
//! - [`jobs::indexing`]: drains the pending-document queues into the
//!   content and time indexes, gated by the backpressure check
//! - [`jobs::reindex`]: full-table scan of the relational source into
//!   the minimal index
//!
//! Both run on a continue-at-all-costs policy: any failure is logged and
//! the scheduler proceeds to its next tick.
//!
//! # Example
//!
//! ```ignore
//! use codetrawl_scheduler::{SchedulerService, SchedulerConfig};
//! use codetrawl_scheduler::jobs::{create_indexing_job, IndexingJobConfig};
//!
//! let scheduler = SchedulerService::new(SchedulerConfig::default()).await?;
//! create_indexing_job(
//!     &scheduler,
//!     gate,
//!     indexer,
//!     content_queue,
//!     time_queue,
//!     IndexingJobConfig::default(),
//! )
//! .await?;
//! scheduler.start().await?;
//! ```

mod config;
mod error;
pub mod jobs;
mod scheduler;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use scheduler::{validate_cron_expression, SchedulerService};
