//! Content resolution
//!
//! Fills every blank field of the request through its fallback chain, one
//! field at a time: caller value first, then the document store (source
//! document, url), then AI generation (summary, tags, short title, cover).
//! Once a field is written it stays written.
//!
//! A field that cannot be resolved is fatal only when the whole run depends
//! on it; otherwise it stays empty and the platforms that needed it are
//! skipped at dispatch.

use std::path::Path;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crosspub_collab::{prompts, AiCollaborator, DocumentSource, SourceDocument};

use crate::artifacts::{base_name, ArtifactStore};
use crate::config::AppConfig;
use crate::content::{Field, ResolvedContent};
use crate::error::{Error, Result};
use crate::markdown::MarkdownCleaner;
use crate::request::{FieldSpec, PublishRequest, TagSpec};
use crate::retry::with_retries;
use crate::tags::parse_tag_reply;
use crate::textlen::{count_chars, validate};

/// Pause between generation attempts
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Why one generation step produced nothing
#[derive(Debug)]
enum AskError {
    Empty,
    Collab(crosspub_collab::Error),
}

impl std::fmt::Display for AskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty reply"),
            Self::Collab(err) => write!(f, "{err}"),
        }
    }
}

/// Fills a [`ResolvedContent`] from a request
pub struct ContentResolver<'a> {
    config: &'a AppConfig,
    ai: &'a dyn AiCollaborator,
    docs: &'a dyn DocumentSource,
    store: &'a ArtifactStore,
}

impl<'a> ContentResolver<'a> {
    /// Create a resolver over the run's collaborators
    #[must_use]
    pub fn new(
        config: &'a AppConfig,
        ai: &'a dyn AiCollaborator,
        docs: &'a dyn DocumentSource,
        store: &'a ArtifactStore,
    ) -> Self {
        Self {
            config,
            ai,
            docs,
            store,
        }
    }

    /// Resolve every field of `request`
    ///
    /// `required` holds the fields the run cannot proceed without; a
    /// resolution failure on one of those aborts the run.
    pub async fn resolve(
        &self,
        request: &PublishRequest,
        required: &[Field],
    ) -> Result<ResolvedContent> {
        let mut content = ResolvedContent::new(request.title.clone());
        content.author = request.author.clone();

        let document = self.resolve_document(request, required, &mut content).await?;
        let base = base_name(content.markdown.as_deref(), &content.title);

        self.resolve_url(request, required, document.as_ref(), &mut content)?;
        self.resolve_summary(request, required, &base, &mut content).await?;
        self.resolve_short_title(request, &base, &mut content).await?;
        self.resolve_tags(request, required, &base, &mut content).await?;
        self.resolve_cover(request, required, &base, &mut content).await?;

        info!(
            summary = content.summary.is_some(),
            tags = content.tags.len(),
            cover = content.cover.is_some(),
            url = content.url.is_some(),
            "content resolved"
        );
        Ok(content)
    }

    /// Fatal when the whole run depends on `field`, degraded otherwise
    fn unresolved(&self, field: Field, required: &[Field]) -> Result<()> {
        if required.contains(&field) {
            Err(Error::Generation { field })
        } else {
            warn!(%field, "left unresolved; dependent platforms will be skipped");
            Ok(())
        }
    }

    async fn resolve_document(
        &self,
        request: &PublishRequest,
        required: &[Field],
        content: &mut ResolvedContent,
    ) -> Result<Option<SourceDocument>> {
        if let Some(path) = &request.markdown {
            if !path.is_file() {
                return Err(Error::SourceNotFound { path: path.clone() });
            }
            content.markdown = Some(path.clone());
            return Ok(None);
        }

        let document = match self.docs.lookup(&request.title).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                warn!(title = %request.title, "document store has no match");
                self.unresolved(Field::SourceDocument, required)?;
                return Ok(None);
            }
            Err(err) => {
                warn!(%err, "document lookup failed");
                self.unresolved(Field::SourceDocument, required)?;
                return Ok(None);
            }
        };

        let dest = self.store.dir().join("documents");
        match self.docs.download_markdown(&document, &dest).await {
            Ok(path) => {
                self.clean_downloaded_markdown(&path)?;
                info!(path = %path.display(), "source document ready");
                content.markdown = Some(path);
                Ok(Some(document))
            }
            Err(err) => {
                warn!(%err, "document download failed");
                self.unresolved(Field::SourceDocument, required)?;
                // The hit can still supply the canonical URL.
                Ok(Some(document))
            }
        }
    }

    /// Strip promo lines from a freshly downloaded document. Caller-supplied
    /// files are left untouched.
    fn clean_downloaded_markdown(&self, path: &Path) -> Result<()> {
        if self.config.clean_keywords.is_empty() {
            return Ok(());
        }
        let report = MarkdownCleaner::new(self.config.clean_keywords.clone())
            .with_backup(self.config.backup_markdown)
            .clean_file(path)?;
        if report.removed_lines > 0 {
            debug!(removed = report.removed_lines, "promo lines stripped");
        }
        Ok(())
    }

    fn resolve_url(
        &self,
        request: &PublishRequest,
        required: &[Field],
        document: Option<&SourceDocument>,
        content: &mut ResolvedContent,
    ) -> Result<()> {
        if let Some(url) = &request.url {
            content.url = Some(url.clone());
            return Ok(());
        }
        if let Some(document) = document {
            if !document.url.is_empty() {
                content.url = Some(document.url.clone());
                return Ok(());
            }
        }
        self.unresolved(Field::Url, required)
    }

    async fn resolve_summary(
        &self,
        request: &PublishRequest,
        required: &[Field],
        base: &str,
        content: &mut ResolvedContent,
    ) -> Result<()> {
        let text = match request.summary_spec() {
            FieldSpec::Value(text) => text,
            FieldSpec::Auto | FieldSpec::Omitted => {
                let Some(markdown) = content.markdown.clone() else {
                    warn!("no source document to summarize");
                    return self.unresolved(Field::Summary, required);
                };
                let prompt = prompts::summary(self.config.summary_limit);
                match self.ask_about(&markdown, &prompt).await {
                    Ok(reply) => reply,
                    Err(err) => {
                        warn!(%err, "summary generation failed");
                        return self.unresolved(Field::Summary, required);
                    }
                }
            }
        };

        let verdict = validate(&text, self.config.summary_limit);
        info!("summary check: {}", verdict.message);
        if !verdict.ok {
            return Err(Error::SummaryTooLong {
                original: verdict.original_count,
                cleaned: verdict.cleaned_count,
                limit: self.config.summary_limit,
            });
        }
        let summary = verdict.effective().to_string();
        self.store.save_text("summary", base, &summary)?;
        content.summary = Some(summary);
        Ok(())
    }

    async fn resolve_short_title(
        &self,
        request: &PublishRequest,
        base: &str,
        content: &mut ResolvedContent,
    ) -> Result<()> {
        if let Some(short_title) = &request.short_title {
            content.short_title = short_title.clone();
            return Ok(());
        }
        let limit = self.config.short_title_limit;
        if count_chars(&content.title) <= limit {
            // short_title already defaults to the title
            return Ok(());
        }

        let prompt = prompts::short_title(&content.title, limit);
        match self.ask(&prompt).await {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                if !reply.is_empty() && count_chars(&reply) <= limit {
                    self.store.save_text("short_title", base, &reply)?;
                    content.short_title = reply;
                } else {
                    warn!(
                        chars = count_chars(&reply),
                        limit, "generated short title over the threshold, keeping the full title"
                    );
                }
            }
            Err(err) => {
                warn!(%err, "short title generation failed, keeping the full title");
            }
        }
        Ok(())
    }

    async fn resolve_tags(
        &self,
        request: &PublishRequest,
        required: &[Field],
        base: &str,
        content: &mut ResolvedContent,
    ) -> Result<()> {
        match request.tag_spec() {
            TagSpec::List(tags) => {
                content.tags = tags;
                Ok(())
            }
            TagSpec::Auto | TagSpec::Omitted => {
                let reply = match content.markdown.clone() {
                    Some(markdown) => self.ask_about(&markdown, &prompts::tags()).await,
                    None => self.ask(&prompts::tags_for_title(&content.title)).await,
                };
                match reply {
                    Ok(reply) => {
                        let tags = parse_tag_reply(&reply);
                        if tags.is_empty() {
                            warn!(reply = %reply, "tag reply contained no usable tags");
                            self.unresolved(Field::Tags, required)
                        } else {
                            self.store.save_text("tags", base, &tags.join(","))?;
                            debug!(?tags, "tags adopted");
                            content.tags = tags;
                            Ok(())
                        }
                    }
                    Err(err) => {
                        warn!(%err, "tag generation failed");
                        self.unresolved(Field::Tags, required)
                    }
                }
            }
        }
    }

    async fn resolve_cover(
        &self,
        request: &PublishRequest,
        required: &[Field],
        base: &str,
        content: &mut ResolvedContent,
    ) -> Result<()> {
        if let Some(path) = &request.cover {
            let metadata = std::fs::metadata(path).map_err(|e| Error::Asset {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            if !metadata.is_file() {
                return Err(Error::Asset {
                    path: path.clone(),
                    reason: "not a regular file".to_string(),
                });
            }
            content.cover = Some(path.clone());
            return Ok(());
        }

        let brief = match content.markdown.clone() {
            Some(markdown) => self.ask_about(&markdown, &prompts::cover_brief()).await,
            None => self.ask(&prompts::cover_brief_for_title(&content.title)).await,
        };
        let brief = match brief {
            Ok(brief) => {
                self.store.save_text("cover_prompt", base, &brief)?;
                brief
            }
            Err(err) => {
                warn!(%err, "cover prompt generation failed");
                return self.unresolved(Field::CoverImage, required);
            }
        };

        match self
            .ai
            .generate_images(&brief, self.config.cover_ratio)
            .await
        {
            Ok(images) if !images.is_empty() => {
                let chosen = images
                    .choose(&mut rand::thread_rng())
                    .expect("non-empty image list")
                    .clone();
                let cover = std::fs::canonicalize(&chosen).unwrap_or(chosen);
                info!(cover = %cover.display(), candidates = images.len(), "cover selected");
                content.cover = Some(cover);
                Ok(())
            }
            Ok(_) => {
                warn!("image generation produced no files");
                self.unresolved(Field::CoverImage, required)
            }
            Err(err) => {
                warn!(%err, "image generation failed");
                self.unresolved(Field::CoverImage, required)
            }
        }
    }

    /// One generation call with bounded retries, document-grounded
    async fn ask_about(&self, markdown: &Path, prompt: &str) -> std::result::Result<String, AskError> {
        with_retries(self.config.generation_attempts, RETRY_DELAY, || async move {
            match self
                .ai
                .get_reply_about(markdown, prompt, self.config.reply_timeout)
                .await
            {
                Ok(Some(reply)) => Ok(reply),
                Ok(None) => Err(AskError::Empty),
                Err(err) => Err(AskError::Collab(err)),
            }
        })
        .await
    }

    /// One generation call with bounded retries, prompt only
    async fn ask(&self, prompt: &str) -> std::result::Result<String, AskError> {
        with_retries(self.config.generation_attempts, RETRY_DELAY, || async move {
            match self.ai.get_reply(prompt, self.config.reply_timeout).await {
                Ok(Some(reply)) => Ok(reply),
                Ok(None) => Err(AskError::Empty),
                Err(err) => Err(AskError::Collab(err)),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DingTalkCredentials, WechatCredentials};
    use crosspub_collab::AspectRatio;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// AI stub answering from a queue; an exhausted queue means no reply
    #[derive(Default)]
    struct StubAi {
        replies: Mutex<VecDeque<String>>,
        images: Mutex<Vec<PathBuf>>,
    }

    impl StubAi {
        fn with_replies(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
                images: Mutex::new(Vec::new()),
            }
        }

        fn add_images(self, images: Vec<PathBuf>) -> Self {
            *self.images.lock().unwrap() = images;
            self
        }
    }

    #[async_trait::async_trait]
    impl AiCollaborator for StubAi {
        async fn get_reply(
            &self,
            _prompt: &str,
            _timeout: Duration,
        ) -> crosspub_collab::Result<Option<String>> {
            Ok(self.replies.lock().unwrap().pop_front())
        }

        async fn get_reply_about(
            &self,
            _document: &Path,
            prompt: &str,
            timeout: Duration,
        ) -> crosspub_collab::Result<Option<String>> {
            self.get_reply(prompt, timeout).await
        }

        async fn generate_images(
            &self,
            _prompt: &str,
            _ratio: AspectRatio,
        ) -> crosspub_collab::Result<Vec<PathBuf>> {
            Ok(self.images.lock().unwrap().clone())
        }
    }

    mockall::mock! {
        Docs {}

        #[async_trait::async_trait]
        impl DocumentSource for Docs {
            async fn lookup(&self, title: &str) -> crosspub_collab::Result<Option<SourceDocument>>;
            async fn download_markdown(
                &self,
                document: &SourceDocument,
                dest_dir: &Path,
            ) -> crosspub_collab::Result<PathBuf>;
        }
    }

    fn no_docs() -> MockDocs {
        let mut docs = MockDocs::new();
        docs.expect_lookup().returning(|_| Ok(None));
        docs
    }

    fn config() -> AppConfig {
        AppConfig::new(
            DingTalkCredentials {
                app_key: "k".to_string(),
                app_secret: "s".to_string(),
                user_id: "u".to_string(),
            },
            WechatCredentials {
                app_id: "a".to_string(),
                app_secret: "s".to_string(),
            },
        )
        .with_reply_timeout(Duration::from_millis(10))
        .with_generation_attempts(1)
    }

    fn write_markdown(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("文章.md");
        std::fs::write(&path, "# 标题\n正文\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_explicit_values_pass_through() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let ai = StubAi::default();
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path().join("results"));
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("短标题")
            .unwrap()
            .with_author("作者")
            .with_summary("一段现成的摘要")
            .with_url("https://example.com/a")
            .with_markdown(&markdown)
            .with_tags("rust,工具");

        let content = resolver.resolve(&request, &[]).await.unwrap();
        assert_eq!(content.title, "短标题");
        assert_eq!(content.short_title, "短标题");
        assert_eq!(content.author.as_deref(), Some("作者"));
        assert_eq!(content.summary.as_deref(), Some("一段现成的摘要"));
        assert_eq!(content.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(content.tags, vec!["rust", "工具"]);
        // The adopted summary is persisted either way.
        assert!(dir.path().join("results/summary_文章.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_explicit_markdown_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config();
        let ai = StubAi::default();
        let docs = MockDocs::new();
        let store = ArtifactStore::new(dir.path());
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("T")
            .unwrap()
            .with_markdown("/no/such/file.md");
        let err = resolver.resolve(&request, &[]).await.unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_summary_generated_from_document() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let ai = StubAi::with_replies(&["生成的摘要内容"]);
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path().join("results"));
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("T")
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("auto")
            .with_url("https://example.com")
            .with_tags("a");
        let content = resolver
            .resolve(&request, &[Field::Summary])
            .await
            .unwrap();
        assert_eq!(content.summary.as_deref(), Some("生成的摘要内容"));
    }

    #[tokio::test]
    async fn test_over_budget_summary_aborts() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let ai = StubAi::default();
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path());
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("T")
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("字".repeat(150))
            .with_url("u")
            .with_tags("a");
        let err = resolver.resolve(&request, &[]).await.unwrap_err();
        match err {
            Error::SummaryTooLong {
                original,
                cleaned,
                limit,
            } => {
                assert_eq!(original, 150);
                assert_eq!(cleaned, 150);
                assert_eq!(limit, 120);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_generated_summary_failure_is_fatal_only_when_required() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path());

        // Not required: run continues with no summary.
        let ai = StubAi::default();
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);
        let request = PublishRequest::new("T")
            .unwrap()
            .with_markdown(&markdown)
            .with_url("u")
            .with_tags("a");
        let content = resolver.resolve(&request, &[]).await.unwrap();
        assert!(content.summary.is_none());

        // Required: the same situation aborts.
        let ai = StubAi::default();
        let docs = no_docs();
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);
        let err = resolver
            .resolve(&request, &[Field::Summary])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation { field: Field::Summary }));
    }

    #[tokio::test]
    async fn test_tags_generated_and_filtered() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let ai = StubAi::with_replies(&["[rust-lang, Tokio, 异步编程]"]);
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path().join("results"));
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("T")
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("s")
            .with_url("u")
            .with_tags("auto");
        let content = resolver.resolve(&request, &[Field::Tags]).await.unwrap();
        assert_eq!(content.tags, vec!["Tokio", "异步编程"]);
        assert!(dir.path().join("results/tags_文章.txt").exists());
    }

    #[tokio::test]
    async fn test_long_title_gets_generated_short_title() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let long_title = "这是一个远远超过二十个字符阈值的非常非常长的文章标题";
        let ai = StubAi::with_replies(&["短标题版本"]);
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path().join("results"));
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new(long_title)
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("s")
            .with_url("u")
            .with_tags("a");
        let content = resolver.resolve(&request, &[]).await.unwrap();
        assert_eq!(content.short_title, "短标题版本");
        assert_eq!(content.title, long_title);
    }

    #[tokio::test]
    async fn test_explicit_short_title_wins_without_generation() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let ai = StubAi::default();
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path());
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("一个远远超过二十个字符阈值的非常非常长的文章标题")
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("s")
            .with_url("u")
            .with_tags("a")
            .with_short_title("手写短标题");
        let content = resolver.resolve(&request, &[]).await.unwrap();
        assert_eq!(content.short_title, "手写短标题");
    }

    #[tokio::test]
    async fn test_overlong_generated_short_title_falls_back_to_title() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let config = config();
        let long_title = "这是一个远远超过二十个字符阈值的非常非常长的文章标题";
        let ai = StubAi::with_replies(&[
            "这个生成的所谓短标题本身就已经超过了二十个字符的限制",
        ]);
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path());
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new(long_title)
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("s")
            .with_url("u")
            .with_tags("a");
        let content = resolver.resolve(&request, &[]).await.unwrap();
        assert_eq!(content.short_title, long_title);
    }

    #[tokio::test]
    async fn test_cover_generated_and_picked_from_candidates() {
        let dir = TempDir::new().unwrap();
        let markdown = write_markdown(&dir);
        let first = dir.path().join("img1.png");
        let second = dir.path().join("img2.png");
        std::fs::write(&first, b"png").unwrap();
        std::fs::write(&second, b"png").unwrap();

        let config = config();
        let ai = StubAi::with_replies(&["an english image prompt"])
            .add_images(vec![first.clone(), second.clone()]);
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path().join("results"));
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("T")
            .unwrap()
            .with_markdown(&markdown)
            .with_summary("s")
            .with_url("u")
            .with_tags("a");
        let content = resolver
            .resolve(&request, &[Field::CoverImage])
            .await
            .unwrap();
        let cover = content.cover.unwrap();
        let candidates = [
            std::fs::canonicalize(&first).unwrap(),
            std::fs::canonicalize(&second).unwrap(),
        ];
        assert!(candidates.contains(&cover));
        assert!(dir.path().join("results/cover_prompt_文章.txt").exists());
    }

    #[tokio::test]
    async fn test_document_lookup_supplies_markdown_and_url() {
        let dir = TempDir::new().unwrap();
        let results = dir.path().join("results");
        let config = config();
        let ai = StubAi::default();

        let downloaded = results.join("documents").join("文章.md");
        let mut docs = MockDocs::new();
        docs.expect_lookup().returning(|title| {
            Ok(Some(SourceDocument {
                node_id: "n1".to_string(),
                title: title.to_string(),
                url: "https://docs.example.com/n1".to_string(),
            }))
        });
        let downloaded_clone = downloaded.clone();
        docs.expect_download_markdown().returning(move |_, dest| {
            std::fs::create_dir_all(dest).unwrap();
            let path = downloaded_clone.clone();
            std::fs::write(&path, "正文\n扫码关注我们\n").unwrap();
            Ok(path)
        });

        let store = ArtifactStore::new(&results);
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);
        let request = PublishRequest::new("文章")
            .unwrap()
            .with_summary("s")
            .with_tags("a");
        let content = resolver
            .resolve(&request, &[Field::SourceDocument, Field::Url])
            .await
            .unwrap();

        assert_eq!(content.markdown.as_deref(), Some(downloaded.as_path()));
        assert_eq!(content.url.as_deref(), Some("https://docs.example.com/n1"));
        // Promo line removed on the way in.
        let cleaned = std::fs::read_to_string(&downloaded).unwrap();
        assert!(!cleaned.contains("扫码关注"));
    }

    #[tokio::test]
    async fn test_missing_document_fatal_when_required() {
        let dir = TempDir::new().unwrap();
        let config = config();
        let ai = StubAi::default();
        let docs = no_docs();
        let store = ArtifactStore::new(dir.path());
        let resolver = ContentResolver::new(&config, &ai, &docs, &store);

        let request = PublishRequest::new("未知文章")
            .unwrap()
            .with_summary("s")
            .with_url("u")
            .with_tags("a");
        let err = resolver
            .resolve(&request, &[Field::SourceDocument])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Generation {
                field: Field::SourceDocument
            }
        ));
    }
}
