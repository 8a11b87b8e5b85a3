//! WeChat official account adapter
//!
//! The longest flow of the set: upload the cover as permanent material over
//! REST, then walk the draft editor (title, author, original-statement
//! dialog, reward off, collection tag, cover from the image library,
//! summary, source link) and save as draft.

mod material;

pub use material::{MaterialClient, MaterialError, UploadedMaterial};

use std::time::Duration;

use tracing::{debug, info};

use crosspub_automation::BrowserSession;
use crosspub_core::{
    AdapterError, AdapterResult, Field, Platform, PlatformAdapter, ResolvedContent,
};

const EDITOR_URL: &str = "https://mp.weixin.qq.com";

const TITLE_BOX: &str = "role=textbox[name=请在这里输入标题]";
const AUTHOR_BOX: &str = "role=textbox[name=请输入作者]";
const SUMMARY_BOX: &str = "role=textbox[name=选填，不填写则默认抓取正文开头部分文字]";
const URL_BOX: &str = "role=textbox[name=输入或粘贴原文链接]";
const SAVE_DRAFT: &str = "role=button[name=保存为草稿]";
const SAVED_TOAST: &str = "text=已保存";

const SAVE_WAIT: Duration = Duration::from_secs(30);

/// Adapter for WeChat official-account drafts
pub struct WechatAdapter {
    material: MaterialClient,
}

impl WechatAdapter {
    /// Create the adapter with its material client
    #[must_use]
    pub fn new(material: MaterialClient) -> Self {
        Self { material }
    }
}

#[async_trait::async_trait]
impl PlatformAdapter for WechatAdapter {
    fn platform(&self) -> Platform {
        Platform::Wechat
    }

    fn required_fields(&self) -> &'static [Field] {
        &[
            Field::SourceDocument,
            Field::Summary,
            Field::Url,
            Field::CoverImage,
        ]
    }

    async fn publish(
        &self,
        session: &dyn BrowserSession,
        content: &ResolvedContent,
        _tags: &[String],
    ) -> AdapterResult<()> {
        let cover = content
            .cover
            .as_deref()
            .expect("dispatcher checks required fields");
        let markdown = content
            .markdown
            .as_deref()
            .expect("dispatcher checks required fields");

        // Library first: the editor's cover picker reads from it.
        let uploaded = self
            .material
            .upload_image(cover)
            .await
            .map_err(|e| AdapterError::Api(e.to_string()))?;
        debug!(media_id = %uploaded.media_id, "cover in the image library");

        let mut page = session.open(EDITOR_URL).await?;
        page.click("text=文章").await?;

        // Body comes in through the markdown import.
        page.click("text=导入").await?;
        page.upload("text=导入 Markdown", markdown).await?;

        page.fill(TITLE_BOX, &content.title).await?;
        if let Some(author) = &content.author {
            page.fill(AUTHOR_BOX, author).await?;
        }

        // Original-statement dialog.
        page.click("text=未声明").await?;
        page.click("role=button[name=确定]").await?;

        // Reward stays off for imported articles.
        page.click("text=不开启").await?;
        page.click("role=button[name=确定]").await?;

        // Cover from the library; the upload above is the newest entry.
        page.click("text=拖拽或选择封面").await?;
        page.click("role=link[name=从图片库选择]").await?;
        page.click("testid=image-picker-first").await?;
        page.click("role=button[name=下一步]").await?;
        page.click("role=button[name=确认]").await?;

        if let Some(summary) = &content.summary {
            page.fill(SUMMARY_BOX, summary).await?;
        }
        if let Some(url) = &content.url {
            page.click("text=未添加").await?;
            page.fill(URL_BOX, url).await?;
            page.click("role=link[name=确定]").await?;
        }

        page.click(SAVE_DRAFT).await?;
        page.wait_visible(SAVED_TOAST, SAVE_WAIT).await?;
        info!("wechat draft saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspub_core::WechatCredentials;

    fn adapter() -> WechatAdapter {
        let credentials = WechatCredentials {
            app_id: "id".to_string(),
            app_secret: "secret".to_string(),
        };
        WechatAdapter::new(MaterialClient::new(&credentials).unwrap())
    }

    #[test]
    fn test_platform_and_requirements() {
        let adapter = adapter();
        assert_eq!(adapter.platform(), Platform::Wechat);
        assert!(adapter.required_fields().contains(&Field::Summary));
        assert!(adapter.required_fields().contains(&Field::CoverImage));
        assert!(adapter.required_fields().contains(&Field::Url));
        assert!(!adapter.required_fields().contains(&Field::Tags));
    }
}
