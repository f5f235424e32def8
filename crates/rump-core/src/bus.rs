//! Bounded FIFO between the extractor and the restore workers.
//!
//! - [`BusSender`] is unique and not clonable: dropping it closes the bus.
//! - [`BusReceiver`] is cloned once per worker; each payload is delivered to exactly one of them.
//! - Both blocking operations race the run's [`CancellationToken`].
//!
//! Capacity is the only buffer in the pipeline: when it is full the extractor
//! waits, which throttles the source scan to the restore rate.
use rump_model::Payload;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::PipelineError;

/// Create a bus holding at most `capacity` payloads.
pub fn channel(capacity: usize) -> (BusSender, BusReceiver) {
    let (tx, rx) = flume::bounded(capacity.max(1));
    (BusSender { tx }, BusReceiver { rx })
}

/// Producer half of the bus.
#[derive(Debug)]
pub struct BusSender {
    tx: flume::Sender<Payload>,
}

impl BusSender {
    /// Enqueue a payload, waiting for free capacity.
    ///
    /// Returns [`PipelineError::Canceled`] if the token fires first, or if every
    /// receiver is gone (all workers have exited, so nothing will drain the bus).
    pub async fn send(
        &self,
        payload: Payload,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Canceled),
            res = self.tx.send_async(payload) => res.map_err(|_| {
                trace!("bus has no receivers left");
                PipelineError::Canceled
            }),
        }
    }

    /// Payloads currently queued.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(usize::MAX)
    }

    /// Close the bus. Queued payloads stay available to receivers.
    pub fn close(self) {
        drop(self);
    }
}

/// Consumer half of the bus.
#[derive(Debug, Clone)]
pub struct BusReceiver {
    rx: flume::Receiver<Payload>,
}

impl BusReceiver {
    /// Dequeue the next payload.
    ///
    /// - `Ok(Some(_))`: next payload in FIFO order;
    /// - `Ok(None)`: the sender is gone and the bus is drained;
    /// - `Err(Canceled)`: the token fired (checked before the queue).
    pub async fn recv(&self, cancel: &CancellationToken) -> Result<Option<Payload>, PipelineError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Canceled),
            res = self.rx.recv_async() => Ok(res.ok()),
        }
    }

    /// Payloads currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
