//! Error types for crosspub-collab

use thiserror::Error;

/// Collaborator error type
#[derive(Debug, Error)]
pub enum Error {
    /// Automation driver failure while steering a collaborator page
    #[error("automation error: {0}")]
    Automation(#[from] crosspub_automation::Error),

    /// The remote API answered with an error payload
    #[error("api error: {0}")]
    Api(String),

    /// Network problem reaching the remote API
    #[error("network error: {0}")]
    Network(String),

    /// The remote API answered with something unparseable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Credential exchange failed
    #[error("auth error: {0}")]
    Auth(String),

    /// Filesystem error around downloaded content
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
