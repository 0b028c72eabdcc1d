//! Error taxonomy.
//!
//! Responsibilities:
//! - Programmer errors (malformed constraints, colors, keys, widget JSON,
//!   widget/state mismatches) surface immediately.
//! - Environment errors (terminal I/O, context lifecycle) propagate to the
//!   session boundary, which restores the terminal before returning them.
//! - Soft edge cases (out-of-bounds writes, empty areas, no pending input)
//!   never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported widget/state combination: {widget} with {state}")]
    UnsupportedState {
        widget: &'static str,
        state: &'static str,
    },

    #[error("Invalid handle: {0}")]
    InvalidHandle(u32),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Context not initialized. Call gf_init() first.")]
    NotInitialized,

    #[error("Context already initialized. Call gf_shutdown() first.")]
    AlreadyInitialized,

    #[error("Context access from non-owner thread is unsupported")]
    WrongThread,

    #[error("{0} lock poisoned after panic")]
    LockPoisoned(&'static str),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for failures caused by the environment rather than the caller.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::NotInitialized
                | Self::AlreadyInitialized
                | Self::WrongThread
                | Self::LockPoisoned(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_state_message() {
        let err = Error::UnsupportedState {
            widget: "paragraph",
            state: "list",
        };
        assert!(err
            .to_string()
            .starts_with("Unsupported widget/state combination"));
        assert!(!err.is_environment());
    }

    #[test]
    fn test_io_error_is_environment() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
        assert!(err.is_environment());
        assert!(err.to_string().contains("gone"));
    }
}
