use crate::metrics::backend::{MetricsBackend, TaskOutcome};
use crate::pipeline::TaskRole;

/// Metrics backend that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_payload_extracted(&self) {}

    #[inline(always)]
    fn record_payload_restored(&self) {}

    #[inline(always)]
    fn record_payload_skipped(&self) {}

    #[inline(always)]
    fn record_task_completed(&self, _: TaskRole, _: TaskOutcome, _: u64) {}
}
