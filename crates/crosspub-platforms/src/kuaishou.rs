//! Kuaishou adapter

use std::time::Duration;

use tracing::info;

use crosspub_automation::BrowserSession;
use crosspub_core::{AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent};

const EDITOR_URL: &str = "https://cp.kuaishou.com/article/publish/video";

const PUBLISH_WAIT: Duration = Duration::from_secs(30);

/// Adapter for Kuaishou image posts
#[derive(Default)]
pub struct KuaishouAdapter;

#[async_trait::async_trait]
impl PlatformAdapter for KuaishouAdapter {
    fn platform(&self) -> Platform {
        Platform::Kuaishou
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
        page.click("text=图文").await?;
        page.upload("text=上传图片", cover).await?;

        // Kuaishou has a single description box; tags ride along as hashtag
        // tokens after the text.
        let mut description = content
            .summary
            .clone()
            .unwrap_or_else(|| content.short_title.clone());
        for tag in tags {
            description.push_str(&format!(" #{tag}"));
        }
        page.fill("role=textbox[name=添加合适的描述]", &description)
            .await?;

        page.click("role=button[name=发布]").await?;
        page.wait_visible("text=发布成功", PUBLISH_WAIT).await?;
        info!("kuaishou post published");
        Ok(())
    }
}
