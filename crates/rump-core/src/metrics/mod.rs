//! Progress hooks for the transfer pipeline.
//!
//! Backends (progress printer, counters) implement [`MetricsBackend`] and are
//! injected into the [`crate::Coordinator`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, TaskOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
