//! Admission control for the indexing pipeline.
//!
//! Producers and the scheduler consult the gate before enqueueing or
//! kicking off a batch. The gate is advisory: it takes no locks, mutates
//! nothing, and is re-evaluated on the next tick. Callers that see a
//! tripped gate skip the tick entirely rather than queue and wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use codetrawl_types::SettingsStore;

use crate::queue::QueueAccounting;

/// Source of the current system load average.
///
/// The sample arrives as a decimal string; values that fail to parse
/// disable the back-off rather than tripping it.
pub trait SystemStats: Send + Sync {
    fn load_average(&self) -> String;
}

/// Load average read from `/proc/loadavg`.
///
/// Reports "0.00" on platforms without procfs, which keeps the back-off
/// permanently clear there.
#[derive(Debug, Default)]
pub struct ProcLoadAverage;

impl SystemStats for ProcLoadAverage {
    fn load_average(&self) -> String {
        #[cfg(target_os = "linux")]
        {
            if let Ok(contents) = std::fs::read_to_string("/proc/loadavg") {
                if let Some(first) = contents.split_whitespace().next() {
                    return first.to_string();
                }
            }
        }
        "0.00".to_string()
    }
}

/// Decides whether ingestion should pause right now.
///
/// Combines a global pause flag, a load-derived back-off, and the queue
/// counters against operator-configured thresholds. Thresholds are read
/// fresh from the settings store on every check.
pub struct BackpressureGate {
    paused: Arc<AtomicBool>,
    settings: Arc<dyn SettingsStore>,
    stats: Arc<dyn SystemStats>,
    accounting: Arc<QueueAccounting>,
}

impl BackpressureGate {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        stats: Arc<dyn SystemStats>,
        accounting: Arc<QueueAccounting>,
    ) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(false)),
            settings,
            stats,
            accounting,
        }
    }

    /// Stop admitting new work until `resume` is called.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// True when ingestion should pause.
    ///
    /// Any one of: background jobs paused, load back-off tripped, queued
    /// document count over the limit, queued line count over the limit.
    pub fn should_pause_adding(&self) -> bool {
        if self.is_paused() {
            return true;
        }

        if self.should_back_off() {
            return true;
        }

        let queued_documents = self.accounting.documents();
        let max_documents = self.settings.max_queued_documents();
        if queued_documents > max_documents {
            info!(
                queued_documents,
                max_documents, "Document queue over limit, pausing ingestion"
            );
            return true;
        }

        let queued_lines = self.accounting.lines();
        let max_lines = self.settings.max_queued_lines();
        if queued_lines > max_lines {
            info!(
                queued_lines,
                max_lines, "Queued line count over limit, pausing ingestion"
            );
            return true;
        }

        false
    }

    /// True when the sampled load average is at or above the configured
    /// ceiling. A ceiling of zero or below disables the back-off.
    pub fn should_back_off(&self) -> bool {
        let ceiling = self.settings.backoff_load_ceiling();
        if ceiling <= 0.0 {
            return false;
        }

        let sample = self
            .stats
            .load_average()
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0);

        if sample >= ceiling {
            info!(
                load_average = sample,
                ceiling, "Load average over ceiling, pausing indexing"
            );
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetrawl_types::Settings;
    use std::sync::Mutex;

    struct FixedStats(String);

    impl SystemStats for FixedStats {
        fn load_average(&self) -> String {
            self.0.clone()
        }
    }

    /// Settings store whose values can be swapped mid-test.
    #[derive(Default)]
    struct MutableSettings {
        max_documents: Mutex<usize>,
        max_lines: Mutex<i64>,
        ceiling: Mutex<f64>,
    }

    impl SettingsStore for MutableSettings {
        fn max_queued_documents(&self) -> usize {
            *self.max_documents.lock().unwrap()
        }

        fn max_queued_lines(&self) -> i64 {
            *self.max_lines.lock().unwrap()
        }

        fn backoff_load_ceiling(&self) -> f64 {
            *self.ceiling.lock().unwrap()
        }
    }

    fn gate_with(
        settings: Arc<dyn SettingsStore>,
        load: &str,
        accounting: Arc<QueueAccounting>,
    ) -> BackpressureGate {
        BackpressureGate::new(settings, Arc::new(FixedStats(load.to_string())), accounting)
    }

    fn settings(max_docs: usize, max_lines: i64, ceiling: f64) -> Arc<dyn SettingsStore> {
        Arc::new(Settings {
            max_queued_documents: max_docs,
            max_queued_lines: max_lines,
            backoff_load_ceiling: ceiling,
            ..Default::default()
        })
    }

    #[test]
    fn test_clear_when_nothing_trips() {
        let accounting = Arc::new(QueueAccounting::new());
        let gate = gate_with(settings(10, 100, 0.0), "99.0", accounting);
        assert!(!gate.should_pause_adding());
    }

    #[test]
    fn test_pause_flag_trips_gate() {
        let accounting = Arc::new(QueueAccounting::new());
        let gate = gate_with(settings(10, 100, 0.0), "0.0", accounting);

        gate.pause();
        assert!(gate.should_pause_adding());

        gate.resume();
        assert!(!gate.should_pause_adding());
    }

    #[test]
    fn test_document_count_over_limit_trips() {
        let accounting = Arc::new(QueueAccounting::new());
        for _ in 0..3 {
            accounting.record_enqueue(1);
        }

        let gate = gate_with(settings(2, 1_000, 0.0), "0.0", Arc::clone(&accounting));
        assert!(gate.should_pause_adding());
    }

    #[test]
    fn test_line_count_over_limit_trips() {
        let accounting = Arc::new(QueueAccounting::new());
        accounting.record_enqueue(500);

        let gate = gate_with(settings(100, 499, 0.0), "0.0", Arc::clone(&accounting));
        assert!(gate.should_pause_adding());
    }

    #[test]
    fn test_back_off_disabled_when_ceiling_not_positive() {
        let accounting = Arc::new(QueueAccounting::new());
        let gate = gate_with(settings(10, 100, 0.0), "1000.0", accounting);
        assert!(!gate.should_back_off());
    }

    #[test]
    fn test_back_off_trips_at_ceiling() {
        let accounting = Arc::new(QueueAccounting::new());
        let gate = gate_with(settings(10, 100, 2.0), "2.0", Arc::clone(&accounting));
        assert!(gate.should_back_off());
        assert!(gate.should_pause_adding());
    }

    #[test]
    fn test_back_off_clear_below_ceiling() {
        let accounting = Arc::new(QueueAccounting::new());
        let gate = gate_with(settings(10, 100, 4.0), "3.99", accounting);
        assert!(!gate.should_back_off());
    }

    #[test]
    fn test_unparseable_load_sample_stays_clear() {
        let accounting = Arc::new(QueueAccounting::new());
        let gate = gate_with(settings(10, 100, 1.0), "not-a-number", accounting);
        assert!(!gate.should_back_off());
    }

    #[test]
    fn test_thresholds_read_fresh_each_check() {
        let accounting = Arc::new(QueueAccounting::new());
        for _ in 0..5 {
            accounting.record_enqueue(1);
        }

        let mutable = Arc::new(MutableSettings::default());
        *mutable.max_documents.lock().unwrap() = 10;
        *mutable.max_lines.lock().unwrap() = 1_000;

        let gate = BackpressureGate::new(
            mutable.clone(),
            Arc::new(FixedStats("0.0".to_string())),
            Arc::clone(&accounting),
        );

        assert!(!gate.should_pause_adding());

        // Operator retunes the limit; no restart, next check sees it
        *mutable.max_documents.lock().unwrap() = 4;
        assert!(gate.should_pause_adding());
    }

    #[test]
    fn test_proc_load_average_returns_decimal_string() {
        let sample = ProcLoadAverage.load_average();
        assert!(sample.parse::<f64>().is_ok());
    }
}
