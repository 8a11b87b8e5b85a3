//! Doubao - chat-page implementation of the AI collaborator
//!
//! Drives the Doubao chat UI through the automation driver. Reply retrieval
//! clicks the reply's copy button once it appears (bounded wait) and reads
//! the OS clipboard; image generation switches the chat into the
//! image-generation skill, picks an aspect ratio, and captures the download
//! the result offers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crosspub_automation::{BrowserSession, PageDriver};

use crate::ai::{AiCollaborator, AspectRatio};
use crate::error::Result;

const CHAT_URL: &str = "https://www.doubao.com/chat/";

const UPLOAD_BUTTON: &str = "testid=upload_file_button";
const UPLOAD_CHOICE: &str = "text=上传文件或图片";
const CHAT_INPUT: &str = "testid=chat_input_input";
const SEND_BUTTON: &str = "testid=chat_input_send_button";
const COPY_BUTTON: &str = "testid=message_action_copy";
const SKILL_MENU: &str = "testid=chat-input-all-skill-button";
const IMAGE_SKILL: &str = "testid=skill_bar_button_3";
const RATIO_MENU: &str = "testid=image-creation-chat-input-picture-ration-button";
const DOWNLOAD_BUTTON: &str = "role=button[name=下载]";

fn ratio_option(ratio: AspectRatio) -> &'static str {
    match ratio {
        AspectRatio::Widescreen => "text=16:9 桌面壁纸，风景",
        AspectRatio::Square => "text=1:1 社交媒体",
        AspectRatio::Classic => "text=4:3 传统照片",
    }
}

/// Doubao collaborator configuration
#[derive(Debug, Clone)]
pub struct DoubaoConfig {
    /// Chat page URL
    pub chat_url: String,
    /// Where captured image downloads land
    pub downloads_dir: PathBuf,
    /// How long image generation is given before download capture
    pub generation_wait: Duration,
    /// Bounded wait for the download to start
    pub download_wait: Duration,
}

impl Default for DoubaoConfig {
    fn default() -> Self {
        Self {
            chat_url: CHAT_URL.to_string(),
            downloads_dir: PathBuf::from("results/generated-images"),
            generation_wait: Duration::from_secs(30),
            download_wait: Duration::from_secs(60),
        }
    }
}

impl DoubaoConfig {
    /// Set the downloads directory
    #[must_use]
    pub fn with_downloads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.downloads_dir = dir.into();
        self
    }

    /// Set the chat page URL
    #[must_use]
    pub fn with_chat_url(mut self, url: impl Into<String>) -> Self {
        self.chat_url = url.into();
        self
    }
}

/// AI collaborator backed by the Doubao chat page
pub struct DoubaoCollaborator {
    session: std::sync::Arc<dyn BrowserSession>,
    config: DoubaoConfig,
    // The chat page stays open for the whole run so context carries between
    // prompts (the image request reuses the prompt-generation conversation).
    page: Mutex<Option<Box<dyn PageDriver>>>,
}

impl DoubaoCollaborator {
    /// Create a collaborator over an automation session
    pub fn new(session: std::sync::Arc<dyn BrowserSession>, config: DoubaoConfig) -> Self {
        Self {
            session,
            config,
            page: Mutex::new(None),
        }
    }

    async fn send_prompt(&self, page: &mut Box<dyn PageDriver>, prompt: &str) -> Result<()> {
        page.click(CHAT_INPUT).await?;
        page.fill(CHAT_INPUT, prompt).await?;
        page.click(SEND_BUTTON).await?;
        debug!(chars = prompt.chars().count(), "prompt sent");
        Ok(())
    }

    /// Wait for the reply's copy button, click it, and read the clipboard
    async fn collect_reply(
        &self,
        page: &mut Box<dyn PageDriver>,
        timeout: Duration,
    ) -> Result<Option<String>> {
        match page.wait_visible(COPY_BUTTON, timeout).await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                warn!(timeout_s = timeout.as_secs(), "no reply within bounded wait");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }
        page.click(COPY_BUTTON).await?;
        let reply = page.clipboard_text().await?;
        let reply = reply.trim();
        if reply.is_empty() {
            warn!("reply clipboard was empty");
            Ok(None)
        } else {
            Ok(Some(reply.to_string()))
        }
    }
}

#[async_trait::async_trait]
impl AiCollaborator for DoubaoCollaborator {
    async fn get_reply(&self, prompt: &str, timeout: Duration) -> Result<Option<String>> {
        let mut guard = self.page.lock().await;
        if guard.is_none() {
            *guard = Some(self.session.open(&self.config.chat_url).await?);
        }
        let page = guard.as_mut().expect("page opened above");
        self.send_prompt(page, prompt).await?;
        self.collect_reply(page, timeout).await
    }

    async fn get_reply_about(
        &self,
        document: &Path,
        prompt: &str,
        timeout: Duration,
    ) -> Result<Option<String>> {
        let mut guard = self.page.lock().await;
        if guard.is_none() {
            *guard = Some(self.session.open(&self.config.chat_url).await?);
        }
        let page = guard.as_mut().expect("page opened above");
        page.click(UPLOAD_BUTTON).await?;
        page.upload(UPLOAD_CHOICE, document).await?;
        info!(document = %document.display(), "document attached");
        self.send_prompt(page, prompt).await?;
        self.collect_reply(page, timeout).await
    }

    async fn generate_images(&self, prompt: &str, ratio: AspectRatio) -> Result<Vec<PathBuf>> {
        let mut guard = self.page.lock().await;
        if guard.is_none() {
            *guard = Some(self.session.open(&self.config.chat_url).await?);
        }
        let page = guard.as_mut().expect("page opened above");

        page.click(SKILL_MENU).await?;
        page.click(IMAGE_SKILL).await?;
        page.click(CHAT_INPUT).await?;
        page.fill(CHAT_INPUT, prompt).await?;
        page.click(RATIO_MENU).await?;
        page.click(ratio_option(ratio)).await?;
        page.click(SEND_BUTTON).await?;
        info!(%ratio, "image generation requested");

        // Rendering takes a while before any download button exists.
        tokio::time::sleep(self.config.generation_wait).await;

        match page
            .wait_visible(DOWNLOAD_BUTTON, self.config.download_wait)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                warn!("no generated image offered a download");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        }
        let files = page
            .capture_downloads(
                DOWNLOAD_BUTTON,
                &self.config.downloads_dir,
                self.config.download_wait,
            )
            .await?;
        info!(count = files.len(), "generated images downloaded");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_automation::ScriptedSession;
    use std::sync::Arc;

    fn collaborator(session: &ScriptedSession) -> DoubaoCollaborator {
        let config = DoubaoConfig {
            generation_wait: Duration::from_millis(1),
            download_wait: Duration::from_millis(10),
            ..DoubaoConfig::default()
        };
        DoubaoCollaborator::new(Arc::new(session.clone()), config)
    }

    #[tokio::test]
    async fn test_get_reply_reads_clipboard() {
        let session = ScriptedSession::new();
        session.push_clipboard("  一段摘要 summary  ");
        let ai = collaborator(&session);

        let reply = ai
            .get_reply("总结一下", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some("一段摘要 summary"));
        assert!(session.saw("click testid=chat_input_send_button"));
        assert!(session.saw("click testid=message_action_copy"));
    }

    #[tokio::test]
    async fn test_empty_clipboard_is_no_reply() {
        let session = ScriptedSession::new();
        session.push_clipboard("   ");
        let ai = collaborator(&session);

        let reply = ai.get_reply("hello", Duration::from_secs(1)).await.unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_missing_copy_button_is_no_reply() {
        let session = ScriptedSession::new();
        session.hide(COPY_BUTTON);
        let ai = collaborator(&session);

        let reply = ai
            .get_reply("hello", Duration::from_millis(5))
            .await
            .unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_document_is_uploaded_before_prompt() {
        let session = ScriptedSession::new();
        session.push_clipboard("reply");
        let ai = collaborator(&session);

        ai.get_reply_about(Path::new("/tmp/post.md"), "总结", Duration::from_secs(1))
            .await
            .unwrap();

        let log = session.log();
        let upload_at = log.iter().position(|e| e.starts_with("upload")).unwrap();
        let send_at = log
            .iter()
            .position(|e| e.contains("chat_input_send_button"))
            .unwrap();
        assert!(upload_at < send_at);
    }

    #[tokio::test]
    async fn test_image_generation_collects_downloads() {
        let session = ScriptedSession::new();
        session.push_downloads(vec![PathBuf::from("/tmp/a.png"), PathBuf::from("/tmp/b.png")]);
        let ai = collaborator(&session);

        let files = ai
            .generate_images("a calm lake", AspectRatio::Widescreen)
            .await
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(session.saw("click testid=skill_bar_button_3"));
        assert!(session.saw("text=16:9 桌面壁纸，风景"));
    }

    #[tokio::test]
    async fn test_image_generation_without_downloads_is_empty() {
        let session = ScriptedSession::new();
        session.hide(DOWNLOAD_BUTTON);
        let ai = collaborator(&session);

        let files = ai
            .generate_images("anything", AspectRatio::Square)
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_chat_page_opened_once() {
        let session = ScriptedSession::new();
        session.push_clipboard("one");
        session.push_clipboard("two");
        let ai = collaborator(&session);

        ai.get_reply("first", Duration::from_secs(1)).await.unwrap();
        ai.get_reply("second", Duration::from_secs(1)).await.unwrap();

        let opens = session
            .log()
            .iter()
            .filter(|e| e.starts_with("open "))
            .count();
        assert_eq!(opens, 1);
    }
}
