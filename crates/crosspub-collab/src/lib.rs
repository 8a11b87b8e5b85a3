//! Crosspub Collab - External Collaborators
//!
//! This crate wraps the two external services the pipeline leans on when the
//! caller leaves inputs blank:
//! - [`AiCollaborator`]: chat-based text and image generation, implemented by
//!   [`DoubaoCollaborator`] over an automation session (reply retrieval goes
//!   through the reply's copy button and the OS clipboard).
//! - [`DocumentSource`]: title lookup and markdown download from a document
//!   store, implemented by [`DingTalkSource`] over the DingTalk open APIs.
//!
//! Both are invoked synchronously with bounded waits; an elapsed wait or an
//! empty reply is an expected negative (`Ok(None)` / empty vec), never an
//! error.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ai;
pub mod dingtalk;
pub mod docsource;
pub mod doubao;
pub mod error;
pub mod prompts;

pub use ai::{AiCollaborator, AspectRatio};
pub use dingtalk::{DingTalkConfig, DingTalkSource};
pub use docsource::{DocumentSource, SourceDocument};
pub use doubao::{DoubaoCollaborator, DoubaoConfig};
pub use error::{Error, Result};
