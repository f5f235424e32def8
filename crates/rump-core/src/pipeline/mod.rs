//! Concurrent transfer pipeline.
//!
//! ```text
//! Extractor ──► Bus (bounded) ──► RestoreWorker × N ──► target
//!     ▲                                  │
//!     └────────── CancellationToken ◄────┘ (Coordinator)
//! ```
mod cancel;
mod interrupt;

mod role;
pub use role::TaskRole;

mod context;
pub use context::{RunStats, StatsSnapshot, TaskContext};

mod report;
pub use report::{RunPhase, RunReport};

mod extractor;
pub use extractor::Extractor;

mod worker;
pub use worker::RestoreWorker;

mod coordinator;
pub use coordinator::{Coordinator, PipelineOptions, host_parallelism};
