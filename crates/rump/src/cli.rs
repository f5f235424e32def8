use clap::Parser;
use rump_model::{
    DEFAULT_BUS_CAPACITY, DEFAULT_SCAN_COUNT, Endpoint, Flag, ModelResult, RunConfig,
};
use rump_observe::{LoggerConfig, LoggerFormat, LoggerLevel};

/// Hot sync of one Redis keyspace into another.
///
/// Every key is copied with DUMP/RESTORE, so values of any type are
/// transferred verbatim. Existing target keys are overwritten.
#[derive(Debug, Parser)]
#[command(name = "rump", version, about, long_about = None)]
pub struct Cli {
    /// Source Redis URL, e.g. redis://localhost:6379/0
    #[arg(long, value_name = "URL")]
    pub from: Endpoint,

    /// Target Redis URL, e.g. redis://localhost:6379/1
    #[arg(long, value_name = "URL")]
    pub to: Endpoint,

    /// Do not print progress symbols
    #[arg(long)]
    pub silent: bool,

    /// Copy remaining expirations of source keys
    #[arg(long)]
    pub ttl: bool,

    /// Number of restore workers [default: number of CPUs]
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Keys buffered between the scan and the workers
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BUS_CAPACITY)]
    pub capacity: usize,

    /// COUNT hint for each SCAN page
    #[arg(long, value_name = "N", default_value_t = DEFAULT_SCAN_COUNT)]
    pub scan_count: usize,

    /// Log filter (stderr), e.g. "info" or "rump_core=debug,warn"
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: LoggerLevel,

    /// Log format: text, json or journald
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,
}

impl Cli {
    /// Validated run configuration.
    pub fn run_config(&self) -> ModelResult<RunConfig> {
        let mut cfg = RunConfig::new(self.from.clone(), self.to.clone());
        cfg.silent = Flag::from(self.silent);
        cfg.sync_ttl = Flag::from(self.ttl);
        cfg.workers = self.workers;
        cfg.bus_capacity = self.capacity;
        cfg.scan_count = self.scan_count;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use rump_model::ModelError;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rump").chain(args.iter().copied()))
    }

    #[test]
    fn minimal_invocation_uses_defaults() {
        let cli = parse(&["--from", "redis://a:6379/0", "--to", "redis://b:6379/0"]).unwrap();
        let cfg = cli.run_config().unwrap();

        assert_eq!(cfg.source.as_str(), "redis://a:6379/0");
        assert!(cfg.silent.is_disabled());
        assert!(cfg.sync_ttl.is_disabled());
        assert_eq!(cfg.workers, None);
        assert_eq!(cfg.bus_capacity, DEFAULT_BUS_CAPACITY);
        assert_eq!(cfg.scan_count, DEFAULT_SCAN_COUNT);

        let log = cli.logger_config();
        assert_eq!(log.format, LoggerFormat::Text);
        assert_eq!(log.level.as_str(), "warn");
    }

    #[test]
    fn flags_map_onto_run_config() {
        let cli = parse(&[
            "--from",
            "redis://a:1/0",
            "--to",
            "redis://b:1/0",
            "--silent",
            "--ttl",
            "--workers",
            "3",
            "--capacity",
            "16",
            "--scan-count",
            "500",
            "--log-format",
            "json",
        ])
        .unwrap();
        let cfg = cli.run_config().unwrap();

        assert!(cfg.silent.is_enabled());
        assert!(cfg.sync_ttl.is_enabled());
        assert_eq!(cfg.workers, Some(3));
        assert_eq!(cfg.bus_capacity, 16);
        assert_eq!(cfg.scan_count, 500);
        assert_eq!(cli.logger_config().format, LoggerFormat::Json);
    }

    #[test]
    fn both_endpoints_are_required() {
        assert!(parse(&["--from", "redis://a:1"]).is_err());
        assert!(parse(&["--to", "redis://a:1"]).is_err());
    }

    #[test]
    fn malformed_url_is_a_parse_error() {
        assert!(parse(&["--from", "http://a:1", "--to", "redis://b:1"]).is_err());
    }

    #[test]
    fn same_endpoint_is_rejected_on_validation() {
        let cli = parse(&["--from", "redis://a:1/0", "--to", "redis://a:1/0"]).unwrap();
        assert!(matches!(cli.run_config(), Err(ModelError::SameEndpoint(_))));
    }

    #[test]
    fn zero_workers_is_rejected_on_validation() {
        let cli = parse(&["--from", "redis://a:1/0", "--to", "redis://b:1/0", "--workers", "0"])
            .unwrap();
        assert!(cli.run_config().is_err());
    }

    #[test]
    fn invalid_log_filter_is_a_parse_error() {
        assert!(
            parse(&["--from", "redis://a:1", "--to", "redis://b:1", "--log-level", "x=loud"])
                .is_err()
        );
    }
}
