use std::sync::Arc;

use rump_model::{Payload, Ttl};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    bus::BusSender,
    error::PipelineError,
    pipeline::{cancel::cancellable, context::TaskContext},
    store::{ScanCursor, SourceStore},
};

/// Scans the source keyspace and feeds the bus, one payload per key.
///
/// Payloads leave with [`Ttl::NONE`]: expirations are resolved by the workers
/// so that the scan never waits on an extra round-trip.
pub struct Extractor {
    source: Arc<dyn SourceStore>,
    ctx: TaskContext,
}

impl Extractor {
    pub fn new(source: Arc<dyn SourceStore>, ctx: TaskContext) -> Self {
        Self { source, ctx }
    }

    /// Run the scan to completion.
    ///
    /// The bus is owned by this call and is closed on every return path,
    /// so workers always reach the end of the queue.
    pub async fn run(self, bus: BusSender, cancel: CancellationToken) -> Result<(), PipelineError> {
        let mut cursor = ScanCursor::START;
        let mut pages: u64 = 0;

        loop {
            let page = cancellable(&cancel, self.source.scan(cursor))
                .await?
                .map_err(PipelineError::Scan)?;
            pages += 1;
            trace!(
                cursor = cursor.get(),
                next = page.next.get(),
                keys = page.keys.len(),
                "scan page"
            );

            let last = page.is_last();
            let next = page.next;
            for key in page.keys {
                self.forward(key, &bus, &cancel).await?;
            }

            if last {
                break;
            }
            cursor = next;
        }

        debug!(
            pages,
            queued = bus.len(),
            source = self.source.name(),
            "scan complete; closing bus"
        );
        bus.close();
        Ok(())
    }

    async fn forward(
        &self,
        key: Vec<u8>,
        bus: &BusSender,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let dumped = cancellable(cancel, self.source.dump(&key))
            .await?
            .map_err(|source| PipelineError::Dump {
                key: String::from_utf8_lossy(&key).into_owned(),
                source,
            })?;

        let Some(value) = dumped else {
            debug!(key = %String::from_utf8_lossy(&key), "key vanished before dump; skipping");
            self.ctx.record_skipped();
            return Ok(());
        };

        bus.send(Payload::new(key, value, Ttl::NONE), cancel).await?;
        self.ctx.record_extracted();
        Ok(())
    }
}
