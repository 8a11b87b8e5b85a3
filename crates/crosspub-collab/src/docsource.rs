//! Document source interface
//!
//! When the caller supplies a title but no markdown file or canonical URL,
//! the pipeline looks both up in a document store by title.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A document found in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Store-internal node id
    pub node_id: String,
    /// Document title as stored
    pub title: String,
    /// Canonical URL of the document
    pub url: String,
}

/// Title-keyed document store
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    /// Find the best match for `title`
    ///
    /// `Ok(None)` means the store has no matching document; only transport
    /// faults are errors.
    async fn lookup(&self, title: &str) -> Result<Option<SourceDocument>>;

    /// Download `document` as markdown into `dest_dir`, returning the file
    async fn download_markdown(
        &self,
        document: &SourceDocument,
        dest_dir: &Path,
    ) -> Result<PathBuf>;
}
