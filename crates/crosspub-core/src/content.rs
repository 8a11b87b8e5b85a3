//! Content - the working record the pipeline fills in
//!
//! A [`ResolvedContent`] starts from the caller's explicit values and gains
//! one field per resolver step. Once written a field is never overwritten by
//! a lower-priority fallback; by dispatch time every field a requested
//! platform needs is present and validated.

use std::path::PathBuf;

use serde::Serialize;

/// A resolvable content field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The markdown source document
    SourceDocument,
    /// Canonical link to the original article
    Url,
    /// Article summary under the character budget
    Summary,
    /// Title variant under the short-title threshold
    ShortTitle,
    /// Topic tag candidates
    Tags,
    /// Cover image file
    CoverImage,
}

impl Field {
    /// Stable lowercase name, used in errors and reports
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceDocument => "source document",
            Self::Url => "url",
            Self::Summary => "summary",
            Self::ShortTitle => "short title",
            Self::Tags => "tags",
            Self::CoverImage => "cover image",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fully resolved content bundle handed to the dispatcher
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedContent {
    /// Full article title
    pub title: String,
    /// Attribution, for platforms that show one
    pub author: Option<String>,
    /// Short title; defaults to the full title when under the threshold
    pub short_title: String,
    /// Summary under the character budget
    pub summary: Option<String>,
    /// Topic tag candidates (allocation per platform happens at dispatch)
    pub tags: Vec<String>,
    /// Cover image path
    pub cover: Option<PathBuf>,
    /// Markdown source document path
    pub markdown: Option<PathBuf>,
    /// Canonical URL
    pub url: Option<String>,
}

impl ResolvedContent {
    /// Start a bundle from the title; the short title defaults to it
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            short_title: title.clone(),
            title,
            ..Self::default()
        }
    }

    /// Whether `field` has been resolved
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::SourceDocument => self.markdown.is_some(),
            Field::Url => self.url.is_some(),
            Field::Summary => self.summary.is_some(),
            Field::ShortTitle => !self.short_title.is_empty(),
            Field::Tags => !self.tags.is_empty(),
            Field::CoverImage => self.cover.is_some(),
        }
    }

    /// The subset of `fields` still unresolved
    #[must_use]
    pub fn missing(&self, fields: &[Field]) -> Vec<Field> {
        fields
            .iter()
            .copied()
            .filter(|field| !self.has(*field))
            .collect()
    }
}
