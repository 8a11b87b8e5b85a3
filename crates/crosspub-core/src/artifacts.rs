//! Results directory
//!
//! Every generated field is persisted as a UTF-8 text file named after the
//! source document, so a run's outputs can be inspected and reused. The
//! final report lands there too, as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Writes run artifacts under one results directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    results_dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `results_dir`
    #[must_use]
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Create the results directory if needed
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.results_dir)?;
        Ok(())
    }

    /// The directory artifacts land in
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.results_dir
    }

    /// Write `text` as `<kind>_<base>.txt`
    pub fn save_text(&self, kind: &str, base: &str, text: &str) -> Result<PathBuf> {
        self.ensure()?;
        let path = self.results_dir.join(format!("{kind}_{base}.txt"));
        fs::write(&path, text)?;
        debug!(path = %path.display(), "artifact written");
        Ok(path)
    }

    /// Write a serializable report as `report_<base>.json`
    pub fn save_report<T: serde::Serialize>(&self, base: &str, report: &T) -> Result<PathBuf> {
        self.ensure()?;
        let path = self.results_dir.join(format!("report_{base}.json"));
        let json = serde_json::to_string_pretty(report)
            .expect("report types serialize without fallible maps");
        fs::write(&path, json)?;
        debug!(path = %path.display(), "report written");
        Ok(path)
    }
}

/// Artifact base name for a run: the document's file stem, or the title when
/// no document was resolved
#[must_use]
pub fn base_name(markdown: Option<&Path>, title: &str) -> String {
    markdown
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| {
            title
                .chars()
                .map(|c| if c.is_whitespace() || c == '/' { '_' } else { c })
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_text_artifacts_follow_the_naming_pattern() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let path = store.save_text("summary", "我的文章", "内容").unwrap();
        assert!(path.ends_with("summary_我的文章.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "内容");
    }

    #[test]
    fn test_base_name_prefers_the_document_stem() {
        let base = base_name(Some(Path::new("/tmp/下载/深入浅出.md")), "别的标题");
        assert_eq!(base, "深入浅出");
    }

    #[test]
    fn test_base_name_falls_back_to_the_title() {
        assert_eq!(base_name(None, "a title / test"), "a_title___test");
    }

    #[test]
    fn test_report_is_json() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        #[derive(serde::Serialize)]
        struct Sample {
            ok: bool,
        }
        let path = store.save_report("post", &Sample { ok: true }).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("\"ok\": true"));
    }
}
