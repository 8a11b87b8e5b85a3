//! AI collaborator interface
//!
//! The pipeline treats text and image generation as an opaque, synchronous
//! capability: send a prompt, get back a reply (or nothing) within a bounded
//! wait. How the reply is retrieved is the implementation's business.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// Aspect ratio for generated cover images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// 16:9, the article-cover default
    Widescreen,
    /// 1:1
    Square,
    /// 4:3
    Classic,
}

impl AspectRatio {
    /// String form, e.g. `16:9`
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Widescreen => "16:9",
            Self::Square => "1:1",
            Self::Classic => "4:3",
        }
    }

    /// Parse from a `W:H` string; anything unrecognized falls back to 16:9
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "1:1" => Self::Square,
            "4:3" => Self::Classic,
            _ => Self::Widescreen,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chat-based generation collaborator
#[async_trait::async_trait]
pub trait AiCollaborator: Send + Sync {
    /// Send `prompt` and retrieve the reply within `timeout`
    ///
    /// `Ok(None)` means the collaborator produced no usable reply in time;
    /// only transport/driver faults are errors.
    async fn get_reply(&self, prompt: &str, timeout: Duration) -> Result<Option<String>>;

    /// Like [`get_reply`](Self::get_reply), grounding the prompt in an
    /// uploaded document
    async fn get_reply_about(
        &self,
        document: &Path,
        prompt: &str,
        timeout: Duration,
    ) -> Result<Option<String>>;

    /// Generate images for `prompt` and return the downloaded files
    ///
    /// An empty vec means generation produced nothing within the bounded
    /// wait.
    async fn generate_images(&self, prompt: &str, ratio: AspectRatio) -> Result<Vec<PathBuf>>;
}
