use std::sync::Arc;

use crate::pipeline::TaskRole;

/// How a pipeline task terminated, for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Task returned normally (scan complete, bus drained, no interrupt).
    Success,
    /// Task failed with a store error or panicked.
    Failure,
    /// Task unwound because the run was canceled.
    Canceled,
}

impl TaskOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskOutcome::Success => "success",
            TaskOutcome::Failure => "failure",
            TaskOutcome::Canceled => "canceled",
        }
    }
}

/// Observer of pipeline progress.
///
/// Implementations are injected into the [`crate::Coordinator`] and called from
/// every task, so they must be cheap and must not block.
pub trait MetricsBackend: Send + Sync + 'static {
    /// A payload was enqueued on the bus.
    fn record_payload_extracted(&self);

    /// A payload was restored on the target.
    fn record_payload_restored(&self);

    /// A key vanished from the source between scan and dump/TTL lookup.
    fn record_payload_skipped(&self);

    /// A pipeline task returned.
    ///
    /// # Arguments
    /// - `role`: which task (extractor, worker N, interrupt watcher)
    /// - `outcome`: how the task terminated
    /// - `duration_ms`: task lifetime in milliseconds
    fn record_task_completed(&self, role: TaskRole, outcome: TaskOutcome, duration_ms: u64);
}

/// Shared handle to a metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
