//! Xiaohongshu adapter
//!
//! Image-first platform: the post is the cover image plus a short text. The
//! title box hard-caps at 20 characters, which is exactly what the short
//! title is for.

use std::time::Duration;

use tracing::info;

use crosspub_automation::BrowserSession;
use crosspub_core::{AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent};

const EDITOR_URL: &str = "https://creator.xiaohongshu.com/publish/publish";

const PUBLISH_WAIT: Duration = Duration::from_secs(30);

/// Adapter for Xiaohongshu notes
#[derive(Default)]
pub struct XiaohongshuAdapter;

#[async_trait::async_trait]
impl PlatformAdapter for XiaohongshuAdapter {
    fn platform(&self) -> Platform {
        Platform::Xiaohongshu
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
        page.click("text=上传图文").await?;
        page.upload("text=点击上传图片", cover).await?;

        page.fill("role=textbox[name=填写标题]", &content.short_title)
            .await?;

        // Body: summary if present, otherwise the title; tags go inline as
        // hashtag tokens.
        let body = content.summary.as_deref().unwrap_or(&content.title);
        page.fill("role=textbox[name=填写更全面的描述信息]", body)
            .await?;
        for tag in tags {
            page.fill("role=textbox[name=填写更全面的描述信息]", &format!("#{tag}"))
                .await?;
            page.press("Enter").await?;
        }

        page.click("role=button[name=发布]").await?;
        page.wait_visible("text=发布成功", PUBLISH_WAIT).await?;
        info!("xiaohongshu note published");
        Ok(())
    }
}
