use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::metrics::{MetricsHandle, noop_metrics};

/// Per-run counters, shared by every task of the run.
#[derive(Debug, Default)]
pub struct RunStats {
    extracted: AtomicU64,
    restored: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`RunStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub extracted: u64,
    pub restored: u64,
    pub skipped: u64,
}

impl RunStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            extracted: self.extracted.load(Ordering::Relaxed),
            restored: self.restored.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Shared context handed to the extractor and the workers.
///
/// Every progress event goes both to the run's own counters (for the final
/// report) and to the injected metrics backend.
#[derive(Clone)]
pub struct TaskContext {
    metrics: MetricsHandle,
    stats: Arc<RunStats>,
}

impl TaskContext {
    /// Create a context with fresh counters.
    pub fn new(metrics: MetricsHandle) -> Self {
        Self {
            metrics,
            stats: Arc::new(RunStats::default()),
        }
    }

    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub(crate) fn record_extracted(&self) {
        self.stats.extracted.fetch_add(1, Ordering::Relaxed);
        self.metrics.record_payload_extracted();
    }

    pub(crate) fn record_restored(&self) {
        self.stats.restored.fetch_add(1, Ordering::Relaxed);
        self.metrics.record_payload_restored();
    }

    pub(crate) fn record_skipped(&self) {
        self.stats.skipped.fetch_add(1, Ordering::Relaxed);
        self.metrics.record_payload_skipped();
    }
}

impl Default for TaskContext {
    fn default() -> Self {
        Self::new(noop_metrics())
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("stats", &self.stats.snapshot())
            .field("metrics", &"<handle>")
            .finish()
    }
}
