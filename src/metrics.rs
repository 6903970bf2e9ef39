use std::sync::atomic::{AtomicU64, Ordering};

use crate::summarization::{SummaryResult, SummarySource};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    remote_summaries: AtomicU64,
    extractive_summaries: AtomicU64,
    deadline_exceeded: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed summary according to the strategy that produced it.
    pub fn record_summary(&self, result: &SummaryResult) {
        let counter = match result.source {
            SummarySource::Remote { .. } => &self.remote_summaries,
            SummarySource::Extractive => &self.extractive_summaries,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request abandoned because its deadline expired.
    pub fn record_deadline_exceeded(&self) {
        self.deadline_exceeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            remote_summaries: self.remote_summaries.load(Ordering::Relaxed),
            extractive_summaries: self.extractive_summaries.load(Ordering::Relaxed),
            deadline_exceeded: self.deadline_exceeded.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Summaries produced by a remote model.
    pub remote_summaries: u64,
    /// Summaries produced by the local extractive algorithm.
    pub extractive_summaries: u64,
    /// Requests that ran out of time before a summary was produced.
    pub deadline_exceeded: u64,
}
