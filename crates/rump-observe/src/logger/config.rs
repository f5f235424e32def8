use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::object::{LoggerFormat, LoggerLevel};

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// `EnvFilter` expression (e.g. `"warn"`, `"rump_core=debug,warn"`).
    pub level: LoggerLevel,
    /// Include module targets in each line.
    pub with_targets: bool,
    /// Allow ANSI colors (text format only).
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: false,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Colors are used only when enabled and stderr is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}
