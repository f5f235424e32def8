use std::{
    io::{self, Write},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use rump_core::{MetricsBackend, TaskOutcome, TaskRole};
use tracing::debug;

const READ_SYMBOL: &[u8] = b"r";
const WRITE_SYMBOL: &[u8] = b"w";

/// Terminal progress for a transfer run.
///
/// Prints `r` for every extracted key and `w` for every restored key, unbuffered,
/// so the interleaving shows how far the workers trail the scan. With `silent`
/// set nothing is written.
pub struct ProgressMetrics {
    silent: bool,
    out: Mutex<Box<dyn Write + Send>>,
    dirty: AtomicBool,
}

impl ProgressMetrics {
    /// Progress on stdout.
    pub fn stdout(silent: bool) -> Self {
        Self::with_writer(silent, io::stdout())
    }

    pub fn with_writer<W>(silent: bool, out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            silent,
            out: Mutex::new(Box::new(out)),
            dirty: AtomicBool::new(false),
        }
    }

    /// Terminate the symbol line so the next output starts on a fresh line.
    pub fn finish(&self) {
        if self.dirty.swap(false, Ordering::AcqRel) {
            self.write(b"\n");
        }
    }

    fn emit(&self, symbol: &[u8]) {
        if self.silent {
            return;
        }
        self.dirty.store(true, Ordering::Release);
        self.write(symbol);
    }

    fn write(&self, bytes: &[u8]) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // A closed stdout must not fail the transfer.
        if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
            debug!(error = %e, "progress output failed");
        }
    }
}

impl MetricsBackend for ProgressMetrics {
    fn record_payload_extracted(&self) {
        self.emit(READ_SYMBOL);
    }

    fn record_payload_restored(&self) {
        self.emit(WRITE_SYMBOL);
    }

    fn record_payload_skipped(&self) {}

    fn record_task_completed(&self, role: TaskRole, outcome: TaskOutcome, duration_ms: u64) {
        debug!(task = %role, outcome = outcome.as_label(), duration_ms, "task completed");
    }
}
