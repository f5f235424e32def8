pub mod bus;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod store;

pub use error::{CoreError, PipelineError};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, TaskOutcome, noop_metrics};
pub use pipeline::{Coordinator, PipelineOptions, RunPhase, RunReport, TaskRole};
pub use store::{ScanCursor, ScanPage, SourceStore, StoreError, TargetStore};

pub mod prelude {
    pub use crate::error::{CoreError, PipelineError};
    pub use crate::pipeline::{Coordinator, PipelineOptions, RunReport};
    pub use crate::store::{SourceStore, StoreError, TargetStore};
}
