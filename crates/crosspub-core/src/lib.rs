//! Crosspub Core - Publish Orchestration Pipeline
//!
//! Everything between "one command invocation" and "a per-platform outcome
//! report" lives here:
//! - [`request`]: the caller's input, with auto-generation sentinels
//! - [`resolve`]: fills blank fields through a prioritized fallback chain
//!   (document store, then AI generation)
//! - [`textlen`]: character budgets and CJK/Latin whitespace cleanup
//! - [`cover`]: cover image size budget enforcement by re-encoding
//! - [`tags`]: per-platform tag allocation and tolerant tag-reply parsing
//! - [`dispatch`]: the platform adapter trait and the isolate-and-continue
//!   dispatcher
//! - [`pipeline`]: stage sequencing with operator checkpoints
//!
//! Stages run strictly in sequence over a single automation session; the
//! only concurrency is none.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod artifacts;
pub mod config;
pub mod content;
pub mod cover;
pub mod dispatch;
pub mod error;
pub mod markdown;
pub mod pipeline;
pub mod request;
pub mod resolve;
pub mod retry;
pub mod tags;
pub mod textlen;

pub use config::{AppConfig, DingTalkCredentials, WechatCredentials};
pub use content::{Field, ResolvedContent};
pub use dispatch::{
    AdapterError, AdapterResult, Dispatcher, OutcomeStatus, Platform, PlatformAdapter,
    PublishOutcome,
};
pub use error::{Error, Result};
pub use pipeline::{
    AutoContinue, Checkpoint, OperatorGate, PipelineReport, PublishPipeline,
};
pub use request::{PlatformSelection, PublishRequest};
pub use textlen::{validate, ValidationResult};
