//! Error types for crosspub-core
//!
//! Fatal categories surface here and abort the run before any platform is
//! touched. Per-platform failures never become errors; they are recorded as
//! outcomes by the dispatcher.

use std::path::PathBuf;

use thiserror::Error;

use crate::content::Field;
use crate::pipeline::Checkpoint;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// A required caller input is missing
    #[error("required input missing: {field}")]
    MissingInput {
        /// Name of the missing input
        field: &'static str,
    },

    /// An explicitly supplied source document does not exist
    #[error("source document not found: {path}")]
    SourceNotFound {
        /// The path the caller supplied
        path: PathBuf,
    },

    /// The summary stays over budget even after whitespace cleanup
    #[error(
        "summary exceeds the {limit}-character budget: {original} characters, \
         {cleaned} after cleanup"
    )]
    SummaryTooLong {
        /// Character count before cleanup
        original: usize,
        /// Character count after cleanup
        cleaned: usize,
        /// The budget that was exceeded
        limit: usize,
    },

    /// Generation produced nothing for a field some requested platform needs
    #[error("could not resolve {field}: no usable reply from the collaborator")]
    Generation {
        /// The field that stayed unresolved
        field: Field,
    },

    /// The cover image cannot be used
    #[error("cover image unusable ({path}): {reason}")]
    Asset {
        /// Path of the offending image
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A required credential is not configured
    #[error("credential missing: {name} is not set")]
    Credential {
        /// Environment variable name
        name: &'static str,
    },

    /// The platform identifier is not recognized
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    /// The operator declined to continue at a checkpoint
    #[error("run aborted by operator after {checkpoint}")]
    Aborted {
        /// Where the run stopped
        checkpoint: Checkpoint,
    },

    /// Collaborator transport/driver failure
    #[error("collaborator error: {0}")]
    Collaborator(#[from] crosspub_collab::Error),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
