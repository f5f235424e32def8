use std::sync::Arc;

use clap::Parser;
use tracing::info;

use rump_core::{Coordinator, PipelineOptions};
use rump_observe::{ProgressMetrics, init_logger};
use rump_redis::{RedisPool, RedisSource, RedisTarget};

mod cli;
mod signal;

use cli::Cli;
use signal::shutdown_signal;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.run_config()?;

    // 1) logger
    init_logger(&cli.logger_config())?;
    info!(from = %cfg.source, to = %cfg.target, "rump starting");

    // 2) stores: one connection for the scan side, one per worker on the restore side
    let opts = PipelineOptions::from_config(&cfg);
    let source = RedisSource::new(RedisPool::connect(&cfg.source, 1).await?)
        .with_scan_count(cfg.scan_count);
    let target = RedisTarget::new(RedisPool::connect(&cfg.target, opts.workers).await?);

    // 3) pipeline
    let progress = Arc::new(ProgressMetrics::stdout(cfg.silent.is_enabled()));
    let coordinator = Coordinator::new(Arc::new(source), Arc::new(target), opts)?
        .with_metrics(progress.clone());

    let result = coordinator.run_until(shutdown_signal()).await;
    progress.finish();

    let report = result?;
    info!(%report, "transfer complete");
    println!("done");
    Ok(())
}
