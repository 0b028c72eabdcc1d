//! Logging Module — opt-in `tracing` subscriber.
//!
//! The library only emits events; nothing is printed until the host calls
//! `init`. Full-screen sessions should log to a file, since stderr shares
//! the terminal with the UI.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{Error, Result};

fn filter(config: &LogConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.filter)
        .map_err(|e| Error::Other(format!("invalid log filter {:?}: {e}", config.filter)))
}

/// Install the global subscriber described by `config`.
///
/// Fails if the filter does not parse, the log file cannot be opened, or a
/// global subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = filter(config)?;
    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    installed.map_err(|e| Error::Other(format!("logging already initialized: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_filter() {
        let config = LogConfig {
            filter: "glyphframe=notalevel".to_string(),
            file: None,
        };
        assert!(matches!(init(&config), Err(Error::Other(_))));
    }

    #[test]
    fn test_filter_parses_directives() {
        let config = LogConfig {
            filter: "glyphframe::render=debug,warn".to_string(),
            file: None,
        };
        assert!(filter(&config).is_ok());
    }
}
