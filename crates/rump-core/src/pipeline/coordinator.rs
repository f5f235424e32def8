//! Supervisor for one transfer run.
//!
//! - Owns the run's [`CancellationToken`] and the bus.
//! - Spawns the interrupt watcher, one extractor and N workers into a `JoinSet`.
//! - Cancels the run on the first failure, joins every task, then reports.
use std::{
    collections::HashMap,
    future::Future,
    num::NonZeroUsize,
    sync::Arc,
    time::Instant,
};

use rump_model::{DEFAULT_BUS_CAPACITY, Flag, RunConfig};
use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::{
    bus,
    error::{CoreError, PipelineError},
    metrics::{MetricsHandle, TaskOutcome, noop_metrics},
    pipeline::{
        RunPhase, RunReport, TaskRole, context::TaskContext, extractor::Extractor,
        interrupt::watch_interrupt, worker::RestoreWorker,
    },
    store::{SourceStore, TargetStore},
};

/// Available parallelism of the host, at least 1.
pub fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Pipeline sizing and behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Number of restore workers.
    pub workers: usize,
    /// Capacity of the bus.
    pub bus_capacity: usize,
    /// Copy remaining expirations from the source.
    pub sync_ttl: Flag,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: host_parallelism(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
            sync_ttl: Flag::disabled(),
        }
    }
}

impl PipelineOptions {
    /// Derive options from a run config.
    ///
    /// Uses host parallelism unless the config pins a worker count.
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            workers: cfg.workers_or(host_parallelism()),
            bus_capacity: cfg.bus_capacity,
            sync_ttl: cfg.sync_ttl,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    pub fn with_sync_ttl(mut self, sync_ttl: Flag) -> Self {
        self.sync_ttl = sync_ttl;
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.workers == 0 {
            return Err(CoreError::InvalidConfig("at least one worker is required".into()));
        }
        if self.bus_capacity == 0 {
            return Err(CoreError::InvalidConfig("bus capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Runs the extractor and the worker pool between a source and a target.
pub struct Coordinator {
    source: Arc<dyn SourceStore>,
    target: Arc<dyn TargetStore>,
    opts: PipelineOptions,
    metrics: MetricsHandle,
}

impl Coordinator {
    pub fn new(
        source: Arc<dyn SourceStore>,
        target: Arc<dyn TargetStore>,
        opts: PipelineOptions,
    ) -> Result<Self, CoreError> {
        opts.validate()?;
        Ok(Self {
            source,
            target,
            opts,
            metrics: noop_metrics(),
        })
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Transfer the whole keyspace with no external interrupt.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Transfer the whole keyspace, stopping early when `interrupt` resolves.
    ///
    /// An interrupted run that hit no other error is reported as `Ok` with
    /// [`RunReport::interrupted`] set. Any other task error is returned; when
    /// several tasks fail, the first real (non-cancellation) error wins.
    #[instrument(
        level = "debug",
        skip(self, interrupt),
        fields(
            source = self.source.name(),
            target = self.target.name(),
            workers = self.opts.workers,
        )
    )]
    pub async fn run_until<F>(&self, interrupt: F) -> Result<RunReport, PipelineError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let started = Instant::now();
        let cancel = CancellationToken::new();
        let ctx = TaskContext::new(Arc::clone(&self.metrics));
        let (tx, rx) = bus::channel(self.opts.bus_capacity);

        let mut phase = RunPhase::Idle;
        let mut tasks: JoinSet<(TaskRole, Result<(), PipelineError>)> = JoinSet::new();
        let mut roles: HashMap<Id, TaskRole> = HashMap::new();

        phase.advance(RunPhase::Running);

        let watcher = watch_interrupt(interrupt, cancel.clone());
        let id = tasks
            .spawn(supervise(TaskRole::Interrupt, ctx.metrics().clone(), watcher))
            .id();
        roles.insert(id, TaskRole::Interrupt);

        let extractor = Extractor::new(Arc::clone(&self.source), ctx.clone());
        let id = tasks
            .spawn(supervise(
                TaskRole::Extractor,
                ctx.metrics().clone(),
                extractor.run(tx, cancel.clone()),
            ))
            .id();
        roles.insert(id, TaskRole::Extractor);

        for i in 0..self.opts.workers {
            let worker = RestoreWorker::new(
                i,
                Arc::clone(&self.source),
                Arc::clone(&self.target),
                self.opts.sync_ttl,
                ctx.clone(),
            );
            let role = TaskRole::Worker(i);
            let id = tasks
                .spawn(supervise(
                    role,
                    ctx.metrics().clone(),
                    worker.run(rx.clone(), cancel.clone()),
                ))
                .id();
            roles.insert(id, role);
        }
        drop(rx);
        info!(
            workers = self.opts.workers,
            bus_capacity = self.opts.bus_capacity,
            sync_ttl = self.opts.sync_ttl.is_enabled(),
            "transfer started"
        );

        let mut pending = 1 + self.opts.workers;
        let mut first_error: Option<PipelineError> = None;
        let mut interrupted = false;

        while let Some(joined) = tasks.join_next_with_id().await {
            let (role, result) = match joined {
                Ok((id, (role, result))) => {
                    roles.remove(&id);
                    (Some(role), result)
                }
                Err(e) => {
                    let role = roles.remove(&e.id());
                    if let Some(role) = role {
                        ctx.metrics()
                            .record_task_completed(role, TaskOutcome::Failure, 0);
                    }
                    let err = PipelineError::Panicked {
                        task: task_label(role),
                        reason: e.to_string(),
                    };
                    (role, Err(err))
                }
            };

            if role.is_some_and(|r| r.is_transfer()) {
                pending -= 1;
            }

            match result {
                Ok(()) => {
                    if role == Some(TaskRole::Extractor) {
                        phase.advance(RunPhase::Draining);
                    }
                }
                Err(err) => {
                    if role == Some(TaskRole::Interrupt) {
                        interrupted = true;
                    }
                    if !err.is_canceled() {
                        let task = task_label(role);
                        if first_error.is_none() {
                            error!(%task, error = %err, "task failed; cancelling transfer");
                            first_error = Some(err);
                        } else {
                            debug!(%task, error = %err, "further task failure");
                        }
                    }
                    phase.advance(RunPhase::Cancelling);
                    cancel.cancel();
                }
            }

            if pending == 0 && !cancel.is_cancelled() {
                debug!("all transfer tasks returned; releasing interrupt watcher");
                cancel.cancel();
            }
        }
        phase.advance(RunPhase::Done);

        let report = RunReport::new(
            ctx.stats().snapshot(),
            self.opts.workers,
            interrupted,
            started.elapsed(),
        );
        match first_error {
            Some(err) => Err(err),
            None => {
                info!(
                    extracted = report.extracted,
                    restored = report.restored,
                    skipped = report.skipped,
                    interrupted = report.interrupted,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "transfer finished"
                );
                Ok(report)
            }
        }
    }
}

fn task_label(role: Option<TaskRole>) -> String {
    role.map_or_else(|| "unknown".to_string(), |r| r.to_string())
}

/// Run a task body, then log and record how it ended.
async fn supervise<F>(
    role: TaskRole,
    metrics: MetricsHandle,
    body: F,
) -> (TaskRole, Result<(), PipelineError>)
where
    F: Future<Output = Result<(), PipelineError>>,
{
    let started = Instant::now();
    debug!(task = %role, "task started");

    let result = body.await;
    let outcome = match &result {
        Ok(()) => TaskOutcome::Success,
        Err(e) if e.is_canceled() => TaskOutcome::Canceled,
        Err(_) => TaskOutcome::Failure,
    };
    metrics.record_task_completed(role, outcome, started.elapsed().as_millis() as u64);
    debug!(task = %role, outcome = outcome.as_label(), "task finished");
    (role, result)
}
