//! Config Module — terminal session options.
//!
//! Responsibilities:
//! - `TerminalOptions`: which terminal modes a session enables
//! - `LogConfig`: subscriber filter and destination
//! - Environment overrides (`GLYPHFRAME_LOG`, `GLYPHFRAME_LOG_FILE`)
//!
//! Both accept partial JSON; omitted fields take their defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const LOG_ENV: &str = "GLYPHFRAME_LOG";
pub const LOG_FILE_ENV: &str = "GLYPHFRAME_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `"glyphframe=debug"`.
    pub filter: String,
    /// Append to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalOptions {
    pub mouse_capture: bool,
    pub bracketed_paste: bool,
    pub focus_change: bool,
    pub hide_cursor: bool,
    pub alternate_screen: bool,
    /// Default wait used by `Session::poll_default`.
    pub poll_timeout_ms: u64,
    pub log: LogConfig,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            mouse_capture: true,
            bracketed_paste: true,
            focus_change: false,
            hide_cursor: true,
            alternate_screen: true,
            poll_timeout_ms: 16,
            log: LogConfig::default(),
        }
    }
}

impl TerminalOptions {
    /// Defaults with the logging environment variables applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(filter) = var(LOG_ENV).filter(|f| !f.trim().is_empty()) {
            self.log.filter = filter;
        }
        if let Some(file) = var(LOG_FILE_ENV).filter(|f| !f.trim().is_empty()) {
            self.log.file = Some(PathBuf::from(file));
        }
        self
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
