//! Publish request parsing
//!
//! The caller's input, parsed once at process start and immutable afterward.
//! A handful of fields accept the sentinel values "auto" or "ai" meaning
//! "generate this for me".

use std::path::PathBuf;

use crate::dispatch::Platform;
use crate::error::{Error, Result};

/// Reserved values that mean "generate this field"
pub const AUTO_SENTINELS: &[&str] = &["auto", "ai"];

/// Whether `value` is an auto-generation sentinel
#[must_use]
pub fn is_sentinel(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    AUTO_SENTINELS.contains(&lowered.as_str())
}

/// How the caller specified a generatable text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// Not given; generate if some platform needs it
    Omitted,
    /// Sentinel given; generate
    Auto,
    /// Concrete value given; use as-is
    Value(String),
}

impl FieldSpec {
    fn from_option(value: Option<&str>) -> Self {
        match value {
            None => Self::Omitted,
            Some(v) if is_sentinel(v) => Self::Auto,
            Some(v) => Self::Value(v.to_string()),
        }
    }
}

/// Which platforms to publish to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSelection {
    /// Every registered platform, in the default order
    All,
    /// An explicit ordered subset
    Listed(Vec<Platform>),
}

impl PlatformSelection {
    /// Parse `"all"` or a comma-separated platform list
    pub fn parse(value: &str) -> Result<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let platforms = value
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(|piece| piece.parse::<Platform>())
            .collect::<Result<Vec<_>>>()?;
        if platforms.is_empty() {
            return Err(Error::UnknownPlatform(value.to_string()));
        }
        Ok(Self::Listed(platforms))
    }

    /// The concrete ordered platform list
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        match self {
            Self::All => Platform::ALL.to_vec(),
            Self::Listed(list) => list.clone(),
        }
    }
}

/// A parsed publish invocation
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Article title; drives document lookup when no file is given
    pub title: String,
    /// Attribution
    pub author: Option<String>,
    /// Summary text or sentinel
    pub summary: Option<String>,
    /// Canonical URL
    pub url: Option<String>,
    /// Local markdown file
    pub markdown: Option<PathBuf>,
    /// Local cover image
    pub cover: Option<PathBuf>,
    /// Comma-separated tags or sentinel
    pub tags: Option<String>,
    /// Explicit short title
    pub short_title: Option<String>,
    /// Target platforms
    pub platforms: PlatformSelection,
}

impl PublishRequest {
    /// Create a request; the title is the one hard requirement
    pub fn new(title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::MissingInput { field: "title" });
        }
        Ok(Self {
            title,
            author: None,
            summary: None,
            url: None,
            markdown: None,
            cover: None,
            tags: None,
            short_title: None,
            platforms: PlatformSelection::All,
        })
    }

    /// Set the author
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the summary (text or sentinel)
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the canonical URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the local markdown file
    #[must_use]
    pub fn with_markdown(mut self, path: impl Into<PathBuf>) -> Self {
        self.markdown = Some(path.into());
        self
    }

    /// Set the local cover image
    #[must_use]
    pub fn with_cover(mut self, path: impl Into<PathBuf>) -> Self {
        self.cover = Some(path.into());
        self
    }

    /// Set the tag list (comma-separated) or sentinel
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Set an explicit short title
    #[must_use]
    pub fn with_short_title(mut self, short_title: impl Into<String>) -> Self {
        self.short_title = Some(short_title.into());
        self
    }

    /// Set the target platforms
    #[must_use]
    pub fn with_platforms(mut self, platforms: PlatformSelection) -> Self {
        self.platforms = platforms;
        self
    }

    /// How the summary was specified
    #[must_use]
    pub fn summary_spec(&self) -> FieldSpec {
        FieldSpec::from_option(self.summary.as_deref())
    }

    /// How the tags were specified; concrete values arrive comma-split
    #[must_use]
    pub fn tag_spec(&self) -> TagSpec {
        match self.tags.as_deref() {
            None => TagSpec::Omitted,
            Some(v) if is_sentinel(v) => TagSpec::Auto,
            Some(v) => {
                let tags: Vec<String> = v
                    .split([',', '，'])
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(str::to_string)
                    .collect();
                if tags.is_empty() {
                    TagSpec::Omitted
                } else {
                    TagSpec::List(tags)
                }
            }
        }
    }
}

/// How the caller specified tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSpec {
    /// Not given
    Omitted,
    /// Sentinel given; generate
    Auto,
    /// Concrete tag list
    List(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_required() {
        assert!(matches!(
            PublishRequest::new("  "),
            Err(Error::MissingInput { field: "title" })
        ));
        assert!(PublishRequest::new("T").is_ok());
    }

    #[test]
    fn test_sentinels() {
        assert!(is_sentinel("auto"));
        assert!(is_sentinel(" AI "));
        assert!(!is_sentinel("autogenerated summary"));
    }

    #[test]
    fn test_summary_spec() {
        let request = PublishRequest::new("T").unwrap();
        assert_eq!(request.summary_spec(), FieldSpec::Omitted);

        let request = request.with_summary("auto");
        assert_eq!(request.summary_spec(), FieldSpec::Auto);

        let request = request.with_summary("一段摘要");
        assert_eq!(
            request.summary_spec(),
            FieldSpec::Value("一段摘要".to_string())
        );
    }

    #[test]
    fn test_tag_spec_splits_both_comma_kinds() {
        let request = PublishRequest::new("T").unwrap().with_tags("rust, cli，工具");
        assert_eq!(
            request.tag_spec(),
            TagSpec::List(vec![
                "rust".to_string(),
                "cli".to_string(),
                "工具".to_string()
            ])
        );
    }

    #[test]
    fn test_platform_selection_all() {
        let selection = PlatformSelection::parse("ALL").unwrap();
        assert_eq!(selection, PlatformSelection::All);
        assert_eq!(selection.platforms().len(), Platform::ALL.len());
    }

    #[test]
    fn test_platform_selection_list_keeps_order() {
        let selection = PlatformSelection::parse("csdn, zhihu").unwrap();
        assert_eq!(
            selection.platforms(),
            vec![Platform::Csdn, Platform::Zhihu]
        );
    }

    #[test]
    fn test_platform_selection_rejects_unknown() {
        assert!(matches!(
            PlatformSelection::parse("zhihu,myspace"),
            Err(Error::UnknownPlatform(name)) if name == "myspace"
        ));
        assert!(PlatformSelection::parse("").is_err());
    }
}
