//! Integration tests for the publish pipeline
//!
//! Exercises the full path across crates: content resolution with stub
//! collaborators, tag allocation, and dispatch through the real platform
//! adapters over a scripted automation session.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use crosspub_automation::ScriptedSession;
use crosspub_collab::{AiCollaborator, AspectRatio, DocumentSource, SourceDocument};
use crosspub_core::{
    AppConfig, AutoContinue, DingTalkCredentials, OutcomeStatus, Platform, PlatformSelection,
    PublishPipeline, PublishRequest, WechatCredentials,
};
use crosspub_platforms::build_adapters;

/// AI stub answering from a queue
#[derive(Default)]
struct QueueAi {
    replies: Mutex<VecDeque<String>>,
    images: Mutex<Vec<PathBuf>>,
}

impl QueueAi {
    fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(reply.to_string());
    }
}

#[async_trait::async_trait]
impl AiCollaborator for QueueAi {
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

/// Document store stub with no documents
struct EmptyDocs;

#[async_trait::async_trait]
impl DocumentSource for EmptyDocs {
    async fn lookup(&self, _title: &str) -> crosspub_collab::Result<Option<SourceDocument>> {
        Ok(None)
    }

    async fn download_markdown(
        &self,
        _document: &SourceDocument,
        _dest_dir: &Path,
    ) -> crosspub_collab::Result<PathBuf> {
        unreachable!("lookup never matches")
    }
}

fn config(dir: &TempDir) -> AppConfig {
    AppConfig::new(
        DingTalkCredentials {
            app_key: "key".to_string(),
            app_secret: "secret".to_string(),
            user_id: "operator".to_string(),
        },
        WechatCredentials {
            app_id: "appid".to_string(),
            app_secret: "appsecret".to_string(),
        },
    )
    .with_results_dir(dir.path().join("results"))
    .with_reply_timeout(Duration::from_millis(10))
    .with_generation_attempts(1)
}

fn write_markdown(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("深入理解所有权.md");
    std::fs::write(&path, "# 深入理解所有权\n正文内容。\n").unwrap();
    path
}

#[tokio::test]
async fn test_full_run_with_generated_tags() {
    let dir = TempDir::new().unwrap();
    let markdown = write_markdown(&dir);

    let config = config(&dir);
    let ai = QueueAi::default();
    ai.push_reply("[Rust, 所有权, 内存安全, rust-lang]");
    // Cover prompt request will find the queue empty, which is fine: no
    // requested platform needs a cover.
    let session = ScriptedSession::new();

    let request = PublishRequest::new("深入理解所有权")
        .unwrap()
        .with_author("作者")
        .with_summary("一篇关于所有权的文章摘要")
        .with_url("https://example.com/ownership")
        .with_markdown(&markdown)
        .with_tags("auto")
        .with_platforms(PlatformSelection::Listed(vec![
            Platform::Csdn,
            Platform::Zhihu,
        ]));

    let adapters = build_adapters(&[Platform::Csdn, Platform::Zhihu], &config).unwrap();
    let pipeline = PublishPipeline::new(&config, &ai, &EmptyDocs, &session, adapters, &AutoContinue);
    let report = pipeline.run(&request).await.unwrap();

    // One outcome per platform, in request order.
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].platform, Platform::Csdn);
    assert_eq!(report.outcomes[0].status, OutcomeStatus::Succeeded);
    assert_eq!(report.outcomes[1].platform, Platform::Zhihu);
    assert_eq!(report.outcomes[1].status, OutcomeStatus::Succeeded);

    // Hyphenated tag filtered out, the rest adopted.
    assert_eq!(report.content.tags, vec!["Rust", "所有权", "内存安全"]);

    // Both editors were driven over the one session.
    assert!(session.saw("open https://editor.csdn.net/md/"));
    assert!(session.saw("open https://zhuanlan.zhihu.com/write"));

    // Artifacts named after the document.
    let results = dir.path().join("results");
    assert!(results.join("tags_深入理解所有权.txt").exists());
    assert!(results.join("summary_深入理解所有权.txt").exists());
    assert!(results.join("report_深入理解所有权.json").exists());
}

#[tokio::test]
async fn test_platform_failure_does_not_stop_the_rest() {
    let dir = TempDir::new().unwrap();
    let markdown = write_markdown(&dir);

    let config = config(&dir);
    let ai = QueueAi::default();
    let session = ScriptedSession::new();
    // The CSDN flow starts from the import button; break it.
    session.fail_clicks_on("text=导入");

    let request = PublishRequest::new("深入理解所有权")
        .unwrap()
        .with_summary("摘要")
        .with_url("https://example.com/a")
        .with_markdown(&markdown)
        .with_tags("rust,内存")
        .with_platforms(PlatformSelection::Listed(vec![
            Platform::Csdn,
            Platform::Zhihu,
        ]));

    let adapters = build_adapters(&[Platform::Csdn, Platform::Zhihu], &config).unwrap();
    let pipeline = PublishPipeline::new(&config, &ai, &EmptyDocs, &session, adapters, &AutoContinue);
    let report = pipeline.run(&request).await.unwrap();

    assert_eq!(report.outcomes[0].status, OutcomeStatus::Failed);
    assert!(report.outcomes[0]
        .detail
        .as_ref()
        .unwrap()
        .contains("text=导入"));
    assert_eq!(report.outcomes[1].status, OutcomeStatus::Succeeded);
}

#[tokio::test]
async fn test_platform_missing_required_field_is_skipped() {
    let dir = TempDir::new().unwrap();
    let markdown = write_markdown(&dir);

    let config = config(&dir);
    // No summary anywhere: generation yields nothing, CSDN requires it,
    // Zhihu does not.
    let ai = QueueAi::default();
    let session = ScriptedSession::new();

    let request = PublishRequest::new("深入理解所有权")
        .unwrap()
        .with_url("https://example.com/a")
        .with_markdown(&markdown)
        .with_tags("rust")
        .with_platforms(PlatformSelection::Listed(vec![
            Platform::Zhihu,
            Platform::Csdn,
        ]));

    let adapters = build_adapters(&[Platform::Zhihu, Platform::Csdn], &config).unwrap();
    let pipeline = PublishPipeline::new(&config, &ai, &EmptyDocs, &session, adapters, &AutoContinue);
    let report = pipeline.run(&request).await.unwrap();

    assert_eq!(report.outcomes[0].platform, Platform::Zhihu);
    assert_eq!(report.outcomes[0].status, OutcomeStatus::Succeeded);
    assert_eq!(report.outcomes[1].platform, Platform::Csdn);
    assert_eq!(report.outcomes[1].status, OutcomeStatus::Skipped);
    assert!(report.outcomes[1]
        .detail
        .as_ref()
        .unwrap()
        .contains("summary"));
    // The CSDN editor was never opened.
    assert!(!session.saw("open https://editor.csdn.net/md/"));
}
