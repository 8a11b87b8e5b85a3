//! Markdown cleanup before import
//!
//! Articles fetched from the document store tend to carry promo lines
//! ("扫码关注" and friends) that have no business on other platforms. The
//! cleaner removes lines matching configured keywords, optionally writing a
//! numbered `.backup` next to the file first.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};

use crate::error::Result;

/// Keywords stripped by default from fetched markdown
pub const DEFAULT_KEYWORDS: &[&str] = &["微信公众号", "扫码关注", "点击关注", "关注我们"];

/// How keywords are matched against lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Line contains the keyword
    #[default]
    Contains,
    /// Line equals the keyword (both trimmed)
    Exact,
    /// Keyword is a regular expression
    Regex,
}

/// What one cleanup pass did
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// The cleaned file
    pub path: PathBuf,
    /// The backup written beforehand, if enabled
    pub backup_path: Option<PathBuf>,
    /// Line count before cleanup
    pub original_lines: usize,
    /// Lines removed
    pub removed_lines: usize,
}

/// Keyword-driven markdown line remover
#[derive(Debug, Clone)]
pub struct MarkdownCleaner {
    keywords: Vec<String>,
    mode: MatchMode,
    case_sensitive: bool,
    backup: bool,
}

impl MarkdownCleaner {
    /// Create a cleaner for the given keywords
    #[must_use]
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            mode: MatchMode::default(),
            case_sensitive: false,
            backup: true,
        }
    }

    /// Set the match mode
    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Match case-sensitively
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Enable or disable backup files
    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    fn line_matches(&self, line: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let haystack = if self.case_sensitive {
            line.to_string()
        } else {
            line.to_lowercase()
        };
        for keyword in &self.keywords {
            let needle = if self.case_sensitive {
                keyword.clone()
            } else {
                keyword.to_lowercase()
            };
            let hit = match self.mode {
                MatchMode::Contains => haystack.contains(&needle),
                MatchMode::Exact => haystack.trim() == needle.trim(),
                MatchMode::Regex => match Regex::new(&needle) {
                    Ok(pattern) => pattern.is_match(&haystack),
                    Err(err) => {
                        warn!(keyword = %keyword, %err, "invalid keyword pattern, skipping");
                        false
                    }
                },
            };
            if hit {
                return true;
            }
        }
        false
    }

    /// Remove matching lines from the file in place
    pub fn clean_file(&self, path: &Path) -> Result<CleanReport> {
        let raw = fs::read(path)?;
        // Store exports are UTF-8; anything else gets a lossy read rather
        // than a failed run.
        let text = String::from_utf8_lossy(&raw);
        let lines: Vec<&str> = text.lines().collect();

        let backup_path = if self.backup {
            let backup = next_backup_path(path);
            fs::write(&backup, raw.as_slice())?;
            Some(backup)
        } else {
            None
        };

        let kept: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|line| !self.line_matches(line))
            .collect();
        let removed = lines.len() - kept.len();

        let mut cleaned = kept.join("\n");
        if text.ends_with('\n') {
            cleaned.push('\n');
        }
        fs::write(path, cleaned)?;

        if removed > 0 {
            info!(
                path = %path.display(),
                removed,
                total = lines.len(),
                "markdown cleaned"
            );
        }
        Ok(CleanReport {
            path: path.to_path_buf(),
            backup_path,
            original_lines: lines.len(),
            removed_lines: removed,
        })
    }
}

impl Default for MarkdownCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }
}

/// First unused `.backup`/`.backupN` sibling of `path`
fn next_backup_path(path: &Path) -> PathBuf {
    let base = path.to_string_lossy();
    let mut candidate = PathBuf::from(format!("{base}.backup"));
    let mut counter = 1;
    while candidate.exists() {
        candidate = PathBuf::from(format!("{base}.backup{counter}"));
        counter += 1;
    }
    candidate
}
