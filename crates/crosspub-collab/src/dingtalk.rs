//! DingTalk - document store client
//!
//! REST wrapper over the DingTalk open APIs used as the document source:
//! credential exchange (cached access token), union-id lookup for the
//! operator account, knowledge-base search, and node details. The first
//! search hit wins; if fetching its details fails, the search hit's own
//! metadata is used instead of failing the lookup.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::docsource::{DocumentSource, SourceDocument};
use crate::error::{Error, Result};

const DEFAULT_API_URL: &str = "https://api.dingtalk.com";
const DEFAULT_OAPI_URL: &str = "https://oapi.dingtalk.com";

/// Refresh this long before the token actually expires
const TOKEN_SLACK: Duration = Duration::from_secs(3600);

const SEARCH_PAGE_SIZE: u32 = 20;

/// DingTalk credentials and endpoints
#[derive(Debug, Clone)]
pub struct DingTalkConfig {
    /// Application key
    pub app_key: String,
    /// Application secret
    pub app_secret: String,
    /// User id of the operator account (resolved to a union id)
    pub user_id: String,
    /// v2 API base URL
    pub api_url: String,
    /// Legacy oapi base URL (user info lives there)
    pub oapi_url: String,
    /// HTTP timeout per request
    pub timeout: Duration,
}

impl DingTalkConfig {
    /// Create a configuration with default endpoints
    #[must_use]
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            user_id: user_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            oapi_url: DEFAULT_OAPI_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the API base URLs (for tests against a local server)
    #[must_use]
    pub fn with_endpoints(mut self, api_url: impl Into<String>, oapi_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.oapi_url = oapi_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBody {
    access_token: String,
    #[serde(default = "default_expire_in")]
    expire_in: u64,
}

fn default_expire_in() -> u64 {
    72 * 3600
}

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
    #[serde(default)]
    unionid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    #[serde(default)]
    items: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    #[serde(default)]
    dentry_uuid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeBody {
    node: Option<NodeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Document source backed by a DingTalk knowledge base
pub struct DingTalkSource {
    client: Client,
    config: DingTalkConfig,
    token: RwLock<Option<CachedToken>>,
    union_id: RwLock<Option<String>>,
}

impl DingTalkSource {
    /// Build a client for the given credentials
    pub fn new(config: DingTalkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
            union_id: RwLock::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.token.clone());
            }
        }

        let url = format!("{}/v1.0/oauth2/accessToken", self.config.api_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "appKey": self.config.app_key,
                "appSecret": self.config.app_secret,
            }))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }
        let body: TokenBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        if body.access_token.is_empty() {
            return Err(Error::Auth("token endpoint returned no token".to_string()));
        }

        let ttl = Duration::from_secs(body.expire_in).saturating_sub(TOKEN_SLACK);
        *self.token.write().await = Some(CachedToken {
            token: body.access_token.clone(),
            refresh_at: Instant::now() + ttl,
        });
        debug!(ttl_s = ttl.as_secs(), "access token refreshed");
        Ok(body.access_token)
    }

    /// Union id of the operator account, cached for the process lifetime
    async fn operator_id(&self) -> Result<String> {
        if let Some(id) = self.union_id.read().await.as_ref() {
            return Ok(id.clone());
        }

        let token = self.access_token().await?;
        let url = format!("{}/user/get", self.config.oapi_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", token.as_str()),
                ("userid", self.config.user_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let body: UserBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        if body.errcode != 0 {
            return Err(Error::Api(format!(
                "user lookup failed ({}): {}",
                body.errcode, body.errmsg
            )));
        }
        if body.unionid.is_empty() {
            return Err(Error::Api(format!(
                "user {} has no union id",
                self.config.user_id
            )));
        }

        *self.union_id.write().await = Some(body.unionid.clone());
        Ok(body.unionid)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        let token = self.access_token().await?;
        let operator_id = self.operator_id().await?;
        let url = format!("{}/v1.0/storage/dentries/search", self.config.api_url);
        let response = self
            .client
            .post(&url)
            .header("x-acs-dingtalk-access-token", &token)
            .json(&json!({
                "operatorId": operator_id,
                "keyword": keyword,
                "option": { "maxResults": SEARCH_PAGE_SIZE },
            }))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "document search returned {}",
                response.status()
            )));
        }
        let body: SearchBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        Ok(body.items)
    }

    async fn node_details(&self, node_id: &str) -> Result<NodeInfo> {
        let token = self.access_token().await?;
        let operator_id = self.operator_id().await?;
        let url = format!("{}/v1.0/wiki/nodes/{}", self.config.api_url, node_id);
        let response = self
            .client
            .get(&url)
            .header("x-acs-dingtalk-access-token", &token)
            .query(&[("operatorId", operator_id.as_str())])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "node details returned {}",
                response.status()
            )));
        }
        let body: NodeBody = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;
        body.node
            .ok_or_else(|| Error::InvalidResponse("node details had no node".to_string()))
    }
}

#[async_trait::async_trait]
impl DocumentSource for DingTalkSource {
    #[instrument(skip(self))]
    async fn lookup(&self, title: &str) -> Result<Option<SourceDocument>> {
        let hits = self.search(title).await?;
        let Some(first) = hits.into_iter().next() else {
            return Ok(None);
        };
        if first.dentry_uuid.is_empty() {
            return Ok(None);
        }

        // Details carry the canonical URL; fall back to the hit if they fail.
        match self.node_details(&first.dentry_uuid).await {
            Ok(node) => Ok(Some(SourceDocument {
                node_id: first.dentry_uuid,
                title: if node.name.is_empty() { first.name } else { node.name },
                url: if node.url.is_empty() { first.url } else { node.url },
            })),
            Err(err) => {
                warn!(%err, node_id = %first.dentry_uuid, "node details failed, using search hit");
                Ok(Some(SourceDocument {
                    node_id: first.dentry_uuid,
                    title: first.name,
                    url: first.url,
                }))
            }
        }
    }

    #[instrument(skip(self, document))]
    async fn download_markdown(
        &self,
        document: &SourceDocument,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let token = self.access_token().await?;
        let operator_id = self.operator_id().await?;
        let url = format!(
            "{}/v1.0/wiki/nodes/{}/export",
            self.config.api_url, document.node_id
        );
        let response = self
            .client
            .get(&url)
            .header("x-acs-dingtalk-access-token", &token)
            .query(&[
                ("operatorId", operator_id.as_str()),
                ("format", "markdown"),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "markdown export returned {}",
                response.status()
            )));
        }
        let markdown = response
            .text()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        std::fs::create_dir_all(dest_dir)?;
        let file_name = safe_file_name(&document.title);
        let path = dest_dir.join(format!("{file_name}.md"));
        std::fs::write(&path, markdown)?;
        debug!(path = %path.display(), "markdown downloaded");
        Ok(path)
    }
}

/// Strip path separators and other awkward characters from a title
fn safe_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}
