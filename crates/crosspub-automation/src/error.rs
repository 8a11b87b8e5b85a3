//! Error types for crosspub-automation

use thiserror::Error;

/// Automation error type
#[derive(Debug, Error)]
pub enum Error {
    /// The driver sidecar rejected or failed a command
    #[error("driver error: {0}")]
    Driver(String),

    /// A bounded wait elapsed before the condition was met
    #[error("timed out after {waited_ms}ms waiting for {what}")]
    Timeout {
        /// What the wait was for (a locator or condition)
        what: String,
        /// How long was waited, in milliseconds
        waited_ms: u64,
    },

    /// A locator matched nothing on the page
    #[error("no element matches {0}")]
    ElementMissing(String),

    /// Network problem reaching the driver sidecar
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem error around download capture
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is an elapsed bounded wait
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
