use std::sync::Arc;

use rump_model::{Flag, Payload, Ttl};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    bus::BusReceiver,
    error::PipelineError,
    pipeline::{cancel::cancellable, context::TaskContext},
    store::{SourceStore, TargetStore},
};

/// Drains the bus into the target store.
///
/// All workers of a run share the bus, the source (for TTL lookups) and the target.
pub struct RestoreWorker {
    id: usize,
    source: Arc<dyn SourceStore>,
    target: Arc<dyn TargetStore>,
    sync_ttl: Flag,
    ctx: TaskContext,
}

impl RestoreWorker {
    pub fn new(
        id: usize,
        source: Arc<dyn SourceStore>,
        target: Arc<dyn TargetStore>,
        sync_ttl: Flag,
        ctx: TaskContext,
    ) -> Self {
        Self {
            id,
            source,
            target,
            sync_ttl,
            ctx,
        }
    }

    /// Restore payloads until the bus is closed and empty.
    ///
    /// Returns `Ok(())` on a drained bus, [`PipelineError::Canceled`] when the
    /// token fires (even with payloads still queued), or the first store error.
    pub async fn run(
        self,
        bus: BusReceiver,
        cancel: CancellationToken,
    ) -> Result<(), PipelineError> {
        let mut restored: u64 = 0;

        while let Some(payload) = bus.recv(&cancel).await? {
            if self.restore(payload, &cancel).await? {
                restored += 1;
            }
        }

        debug!(worker = self.id, restored, "bus drained");
        Ok(())
    }

    /// Restore a single payload; `Ok(false)` when the key vanished from the source.
    async fn restore(
        &self,
        payload: Payload,
        cancel: &CancellationToken,
    ) -> Result<bool, PipelineError> {
        let Some(ttl) = self.resolve_ttl(&payload, cancel).await? else {
            debug!(
                worker = self.id,
                key = %payload.key_lossy(),
                "key vanished before ttl lookup; skipping"
            );
            self.ctx.record_skipped();
            return Ok(false);
        };

        cancellable(
            cancel,
            self.target.restore(payload.key(), ttl, payload.value()),
        )
        .await?
        .map_err(|source| PipelineError::Restore {
            key: payload.key_lossy().into_owned(),
            source,
        })?;

        trace!(worker = self.id, key = %payload.key_lossy(), %ttl, "restored");
        self.ctx.record_restored();
        Ok(true)
    }

    /// TTL to restore with; `None` if the source no longer has the key.
    ///
    /// With TTL sync disabled no lookup is issued and the payload's sentinel is kept.
    async fn resolve_ttl(
        &self,
        payload: &Payload,
        cancel: &CancellationToken,
    ) -> Result<Option<Ttl>, PipelineError> {
        if self.sync_ttl.is_disabled() {
            return Ok(Some(payload.ttl()));
        }

        let answer = cancellable(cancel, self.source.ttl(payload.key()))
            .await?
            .map_err(|source| PipelineError::Ttl {
                key: payload.key_lossy().into_owned(),
                source,
            })?;
        Ok(answer.normalize())
    }
}
