//! Zhihu column adapter
//!
//! Imports the markdown into a new column draft, attaches up to three
//! topics, and publishes.

use std::time::Duration;

use tracing::info;

use crosspub_automation::BrowserSession;
use crosspub_core::{AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent};

const EDITOR_URL: &str = "https://zhuanlan.zhihu.com/write";

const TITLE_BOX: &str = "role=textbox[name=请输入标题]";
const TOPIC_BOX: &str = "role=textbox[name=搜索话题]";
const PUBLISH_WAIT: Duration = Duration::from_secs(30);

/// Adapter for Zhihu column articles
#[derive(Default)]
pub struct ZhihuAdapter;

#[async_trait::async_trait]
impl PlatformAdapter for ZhihuAdapter {
    fn platform(&self) -> Platform {
        Platform::Zhihu
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::SourceDocument, Field::Tags]
    }

    async fn publish(
        &self,
        session: &dyn BrowserSession,
        content: &ResolvedContent,
        tags: &[String],
    ) -> AdapterResult<()> {
        let markdown = content
            .markdown
            .as_deref()
            .expect("dispatcher checks required fields");

        let mut page = session.open(EDITOR_URL).await?;
        page.fill(TITLE_BOX, &content.title).await?;

        page.click("text=文档").await?;
        page.upload("text=导入 Markdown", markdown).await?;

        // Topics gate the publish button; zhihu takes at most three.
        page.click("text=添加话题").await?;
        for tag in tags {
            page.fill(TOPIC_BOX, tag).await?;
            page.press("Enter").await?;
        }

        page.click("role=button[name=发布]").await?;
        page.wait_visible("text=发布成功", PUBLISH_WAIT).await?;
        info!("zhihu article published");
        Ok(())
    }
}
