//! CSDN adapter
//!
//! Uses the markdown editor's import, fills the summary box, tags the post
//! and publishes through the settings dialog.

use std::time::Duration;

use tracing::info;

use crosspub_automation::BrowserSession;
use crosspub_core::{AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent};

const EDITOR_URL: &str = "https://editor.csdn.net/md/";

const PUBLISH_WAIT: Duration = Duration::from_secs(30);

/// Adapter for CSDN blog posts
#[derive(Default)]
pub struct CsdnAdapter;

#[async_trait::async_trait]
impl PlatformAdapter for CsdnAdapter {
    fn platform(&self) -> Platform {
        Platform::Csdn
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
        page.fill("role=textbox[name=请输入文章标题]", &content.title)
            .await?;
        page.click("text=导入").await?;
        page.upload("text=导入 Markdown 文件", markdown).await?;

        page.click("role=button[name=发布文章]").await?;

        // Settings dialog: tags, summary, visibility.
        for tag in tags {
            page.click("text=添加文章标签").await?;
            page.fill("role=textbox[name=请输入文字搜索]", tag).await?;
            page.press("Enter").await?;
        }
        page.fill("role=textbox[name=摘要：会在推荐、列表等场景外露]", summary)
            .await?;

        page.click("role=button[name=发布文章确定]").await?;
        page.wait_visible("text=发布成功", PUBLISH_WAIT).await?;
        info!("csdn post published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_automation::ScriptedSession;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_flow_carries_summary_and_tags() {
        let dir = TempDir::new().unwrap();
        let markdown = dir.path().join("post.md");
        std::fs::write(&markdown, "# hi\n").unwrap();

        let mut content = ResolvedContent::new("标题");
        content.markdown = Some(markdown);
        content.summary = Some("一段摘要".to_string());

        let session = ScriptedSession::new();
        let tags: Vec<String> = (0..3).map(|i| format!("t{i}")).collect();
        CsdnAdapter.publish(&session, &content, &tags).await.unwrap();

        assert!(session.saw("open https://editor.csdn.net/md/"));
        assert!(session.saw("= 一段摘要"));
        assert!(session.saw("= t0"));
        assert!(session.saw("= t2"));
    }

    #[test]
    fn test_requirements() {
        assert_eq!(CsdnAdapter.platform(), Platform::Csdn);
        assert!(CsdnAdapter.required_fields().contains(&Field::Summary));
    }
}
