use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid pipeline config: {0}")]
    InvalidConfig(String),
}

/// Terminal error of a pipeline task.
///
/// Everything but [`PipelineError::Canceled`] is a real failure and aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("scan failed: {0}")]
    Scan(#[source] StoreError),

    #[error("dump of key '{key}' failed: {source}")]
    Dump { key: String, source: StoreError },

    #[error("ttl lookup of key '{key}' failed: {source}")]
    Ttl { key: String, source: StoreError },

    #[error("restore of key '{key}' failed: {source}")]
    Restore { key: String, source: StoreError },

    #[error("transfer canceled")]
    Canceled,

    #[error("task {task} panicked: {reason}")]
    Panicked { task: String, reason: String },
}

impl PipelineError {
    /// `true` for cooperative cancellation, which is not a defect.
    #[inline]
    pub fn is_canceled(&self) -> bool {
        matches!(self, PipelineError::Canceled)
    }
}
