//! 51CTO adapter

use std::time::Duration;

use tracing::info;

use crosspub_automation::BrowserSession;
use crosspub_core::{AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent};

const EDITOR_URL: &str = "https://blog.51cto.com/blogger/publish";

const PUBLISH_WAIT: Duration = Duration::from_secs(30);

/// Adapter for 51CTO blog posts
#[derive(Default)]
pub struct Cto51Adapter;

#[async_trait::async_trait]
impl PlatformAdapter for Cto51Adapter {
    fn platform(&self) -> Platform {
        Platform::Cto51
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::SourceDocument, Field::Tags, Field::Summary]
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
        let summary = content
            .summary
            .as_deref()
            .expect("dispatcher checks required fields");

        let mut page = session.open(EDITOR_URL).await?;
        page.fill("role=textbox[name=请输入标题]", &content.title)
            .await?;
        page.click("text=导入文档").await?;
        page.upload("text=选择 Markdown 文件", markdown).await?;

        page.fill("role=textbox[name=摘要]", summary).await?;
        for tag in tags {
            page.fill("role=textbox[name=添加标签]", tag).await?;
            page.press("Enter").await?;
        }

        page.click("role=button[name=发布文章]").await?;
        page.wait_visible("text=发布成功", PUBLISH_WAIT).await?;
        info!("51cto post published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_automation::ScriptedSession;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_flow() {
        let dir = TempDir::new().unwrap();
        let markdown = dir.path().join("post.md");
        std::fs::write(&markdown, "# hi\n").unwrap();

        let mut content = ResolvedContent::new("标题");
        content.markdown = Some(markdown);
        content.summary = Some("摘要".to_string());

        let session = ScriptedSession::new();
        Cto51Adapter
            .publish(&session, &content, &["运维".to_string()])
            .await
            .unwrap();

        assert!(session.saw("open https://blog.51cto.com/blogger/publish"));
        assert!(session.saw("fill role=textbox[name=添加标签] = 运维"));
    }

    #[test]
    fn test_requirements() {
        assert_eq!(Cto51Adapter.platform(), Platform::Cto51);
        assert_eq!(Cto51Adapter.platform().as_str(), "51cto");
    }
}
