//! Pending-document queue with dual accounting.
//!
//! Producers enqueue parsed files; the pipeline drains them in bounded
//! batches. Two counters ride along: pending document count and pending
//! total code lines. Both are atomics so producers never stall behind a
//! long write batch, and both reset only with the process.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use codetrawl_types::CodeDocument;

/// Atomic counters tracking queued work volume.
///
/// The document count tracks queue length: incremented on enqueue,
/// decremented on dequeue. The line count is decremented per document by
/// the pipeline as it processes a batch, so it reflects lines not yet
/// written rather than queue length.
#[derive(Debug, Default)]
pub struct QueueAccounting {
    documents: AtomicUsize,
    lines: AtomicI64,
}

impl QueueAccounting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending document count.
    pub fn documents(&self) -> usize {
        self.documents.load(Ordering::Relaxed)
    }

    /// Pending total code lines.
    pub fn lines(&self) -> i64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub(crate) fn record_enqueue(&self, code_lines: u64) {
        self.documents.fetch_add(1, Ordering::Relaxed);
        self.lines.fetch_add(code_lines as i64, Ordering::Relaxed);
    }

    pub(crate) fn record_dequeue(&self) {
        self.documents.fetch_sub(1, Ordering::Relaxed);
    }

    /// Clear a document's line weight once the pipeline has taken it.
    ///
    /// Called for every drained document whether or not it indexes
    /// cleanly, so the counter cannot drift permanently high.
    pub fn decrement_lines(&self, code_lines: u64) {
        self.lines.fetch_sub(code_lines as i64, Ordering::Relaxed);
    }
}

/// Thread-safe multi-producer queue of documents pending indexing.
///
/// FIFO within a single producer; no ordering or fairness is promised
/// across producers. Enqueue and drain are safe to call concurrently.
#[derive(Debug, Default)]
pub struct DocumentQueue {
    items: Mutex<VecDeque<CodeDocument>>,
    accounting: Arc<QueueAccounting>,
}

impl DocumentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the counters, shareable with the backpressure gate.
    pub fn accounting(&self) -> Arc<QueueAccounting> {
        Arc::clone(&self.accounting)
    }

    /// Append a document and bump both counters.
    pub fn enqueue(&self, doc: CodeDocument) {
        let code_lines = doc.code_lines;
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(doc);
        self.accounting.record_enqueue(code_lines);
    }

    /// Remove and return up to `max` documents in FIFO order.
    ///
    /// Decrements the document counter per item removed; the line counter
    /// is the pipeline's to settle as it processes each document.
    pub fn drain(&self, max: usize) -> Vec<CodeDocument> {
        let mut items = self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let take = max.min(items.len());
        let mut batch = Vec::with_capacity(take);
        for _ in 0..take {
            if let Some(doc) = items.pop_front() {
                self.accounting.record_dequeue();
                batch.push(doc);
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
