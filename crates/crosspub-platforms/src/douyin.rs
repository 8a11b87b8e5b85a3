//! Douyin adapter
//!
//! Publishes as an image post on the creator platform: cover upload, short
//! title, description with tag tokens.

use std::time::Duration;

use tracing::info;

use crosspub_automation::BrowserSession;
use crosspub_core::{AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent};

const EDITOR_URL: &str = "https://creator.douyin.com/creator-micro/content/upload";

const PUBLISH_WAIT: Duration = Duration::from_secs(30);

/// Adapter for Douyin image posts
#[derive(Default)]
pub struct DouyinAdapter;

#[async_trait::async_trait]
impl PlatformAdapter for DouyinAdapter {
    fn platform(&self) -> Platform {
        Platform::Douyin
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::CoverImage, Field::Tags]
    }

    async fn publish(
        &self,
        session: &dyn BrowserSession,
        content: &ResolvedContent,
        tags: &[String],
    ) -> AdapterResult<()> {
        let cover = content
            .cover
            .as_deref()
            .expect("dispatcher checks required fields");

        let mut page = session.open(EDITOR_URL).await?;
        page.click("text=发布图文").await?;
        page.upload("text=上传图文", cover).await?;

        page.fill("role=textbox[name=添加作品标题]", &content.short_title)
            .await?;
        let description = content.summary.as_deref().unwrap_or(&content.title);
        page.fill("role=textbox[name=添加作品简介]", description)
            .await?;
        for tag in tags {
            page.click("text=添加话题").await?;
            page.fill("role=textbox[name=搜索话题]", tag).await?;
            page.press("Enter").await?;
        }

        page.click("role=button[name=发布]").await?;
        page.wait_visible("text=发布成功", PUBLISH_WAIT).await?;
        info!("douyin post published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_automation::ScriptedSession;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_publish_flow() {
        let mut content = ResolvedContent::new("标题");
        content.cover = Some(PathBuf::from("/tmp/cover.png"));
        content.summary = Some("简介".to_string());

        let session = ScriptedSession::new();
        DouyinAdapter
            .publish(&session, &content, &["科技".to_string()])
            .await
            .unwrap();

        assert!(session.saw("upload text=上传图文 <- /tmp/cover.png"));
        assert!(session.saw("= 简介"));
        assert!(session.saw("fill role=textbox[name=搜索话题] = 科技"));
    }

    #[test]
    fn test_requirements() {
        assert_eq!(DouyinAdapter.platform(), Platform::Douyin);
    }
}
