mod config;
mod error;
mod init;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerRfc3339};

/// Install the global tracing subscriber described by `cfg`.
///
/// Every sink writes to stderr (or journald); stdout stays reserved for
/// transfer progress and the completion line.
///
/// # Examples
/// ```rust
/// use rump_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger");
///
/// tracing::info!("logger ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => init::logger_text(cfg),
        LoggerFormat::Json => init::logger_json(cfg),
        LoggerFormat::Journald => init::logger_journald(cfg),
    }
}
