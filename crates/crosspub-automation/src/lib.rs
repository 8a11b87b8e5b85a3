//! Crosspub Automation - Browser Driver Interface
//!
//! This crate defines the interface crosspub uses to drive third-party web
//! editors: a long-lived [`BrowserSession`] that opens pages, and a
//! [`PageDriver`] for interacting with one page (click, fill, upload, bounded
//! waits, clipboard and download capture).
//!
//! The actual driver is an external sidecar process; [`RemoteSession`] talks
//! to it over a small HTTP API. [`scripted`] provides in-process stubs used
//! by tests throughout the workspace.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod remote;
pub mod scripted;
pub mod session;

pub use error::{Error, Result};
pub use remote::{RemoteConfig, RemoteSession};
pub use scripted::{ScriptedPage, ScriptedSession};
pub use session::{BrowserSession, PageDriver};
