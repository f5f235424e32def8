use std::{fmt, time::Duration};

use tracing::debug;

use crate::pipeline::context::StatsSnapshot;

/// Lifecycle of one transfer run.
///
/// `Idle -> Running -> {Draining -> Done} | {Cancelling -> Done}`.
/// A draining run can still fall into `Cancelling` when a worker fails on the last payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    /// Extractor and workers are running.
    Running,
    /// Scan complete, bus closed, workers finishing queued payloads.
    Draining,
    /// Cancellation fired, tasks unwinding.
    Cancelling,
    Done,
}

impl RunPhase {
    pub fn can_advance_to(self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, Draining)
                | (Running, Cancelling)
                | (Running, Done)
                | (Draining, Cancelling)
                | (Draining, Done)
                | (Cancelling, Done)
        )
    }

    /// Move to `next` if the transition is allowed; returns whether it moved.
    pub fn advance(&mut self, next: RunPhase) -> bool {
        if !self.can_advance_to(next) {
            return false;
        }
        debug!(from = %self, to = %next, "run phase transition");
        *self = next;
        true
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Idle => "idle",
            RunPhase::Running => "running",
            RunPhase::Draining => "draining",
            RunPhase::Cancelling => "cancelling",
            RunPhase::Done => "done",
        };
        f.write_str(s)
    }
}

/// Summary of a finished (successful or interrupted) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Payloads enqueued by the extractor.
    pub extracted: u64,
    /// Payloads restored on the target.
    pub restored: u64,
    /// Keys that vanished from the source mid-run.
    pub skipped: u64,
    /// Size of the worker pool.
    pub workers: usize,
    /// The external interrupt fired before the transfer completed.
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl RunReport {
    pub(crate) fn new(
        stats: StatsSnapshot,
        workers: usize,
        interrupted: bool,
        elapsed: Duration,
    ) -> Self {
        Self {
            extracted: stats.extracted,
            restored: stats.restored,
            skipped: stats.skipped,
            workers,
            interrupted,
            elapsed,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "restored {} of {} keys ({} skipped) with {} workers in {:.2?}",
            self.restored, self.extracted, self.skipped, self.workers, self.elapsed
        )?;
        if self.interrupted {
            f.write_str(" (interrupted)")?;
        }
        Ok(())
    }
}
