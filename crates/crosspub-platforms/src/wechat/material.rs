//! WeChat MP material upload
//!
//! REST wrapper over the official-account API: credential exchange for an
//! access token (cached, refreshed five minutes early) and permanent
//! material upload. Uploading the cover ahead of the editor flow puts it in
//! the account's image library where the form expects to find it.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crosspub_core::WechatCredentials;

const BASE_URL: &str = "https://api.weixin.qq.com";

/// WeChat tokens last 7200 seconds; refresh this early
const TOKEN_SLACK: Duration = Duration::from_secs(300);

/// Material upload error
#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    /// The file to upload is missing
    #[error("material file not found: {0}")]
    Missing(PathBuf),

    /// The WeChat API answered with an error code
    #[error("wechat api error {code}: {message}")]
    Api {
        /// `errcode` from the response
        code: i64,
        /// `errmsg` from the response
        message: String,
    },

    /// Network problem reaching the API
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with something unparseable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Filesystem error reading the material
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

fn default_expires_in() -> u64 {
    7200
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    media_id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// A permanently uploaded material
#[derive(Debug, Clone)]
pub struct UploadedMaterial {
    /// Media id the editor references
    pub media_id: String,
    /// CDN URL, when the API returns one
    pub url: Option<String>,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// REST client for the official-account material API
pub struct MaterialClient {
    client: Client,
    credentials: WechatCredentials,
    base_url: String,
    token: RwLock<Option<CachedToken>>,
}

impl MaterialClient {
    /// Build a client for the given account
    pub fn new(credentials: &WechatCredentials) -> Result<Self, MaterialError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| MaterialError::Network(e.to_string()))?;
        Ok(Self {
            client,
            credentials: credentials.clone(),
            base_url: BASE_URL.to_string(),
            token: RwLock::new(None),
        })
    }

    /// Override the API base URL (for tests against a local server)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn access_token(&self) -> Result<String, MaterialError> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.token.clone());
            }
        }

        let url = format!("{}/cgi-bin/token", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.credentials.app_id.as_str()),
                ("secret", self.credentials.app_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MaterialError::Network(e.to_string()))?;
        let body: TokenBody = response
            .json()
            .await
            .map_err(|e| MaterialError::InvalidResponse(e.to_string()))?;
        if body.errcode != 0 {
            return Err(MaterialError::Api {
                code: body.errcode,
                message: body.errmsg,
            });
        }
        if body.access_token.is_empty() {
            return Err(MaterialError::InvalidResponse(
                "token response had no access_token".to_string(),
            ));
        }

        let ttl = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_SLACK);
        *self.token.write().await = Some(CachedToken {
            token: body.access_token.clone(),
            refresh_at: Instant::now() + ttl,
        });
        debug!(ttl_s = ttl.as_secs(), "wechat access token refreshed");
        Ok(body.access_token)
    }

    /// Upload an image as permanent material
    #[instrument(skip(self))]
    pub async fn upload_image(&self, path: &Path) -> Result<UploadedMaterial, MaterialError> {
        if !path.is_file() {
            return Err(MaterialError::Missing(path.to_path_buf()));
        }
        let token = self.access_token().await?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cover.png".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type_for(path))
            .map_err(|e| MaterialError::InvalidResponse(e.to_string()))?;
        let form = multipart::Form::new().part("media", part);

        let url = format!("{}/cgi-bin/material/add_material", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("access_token", token.as_str()), ("type", "image")])
            .multipart(form)
            .send()
            .await
            .map_err(|e| MaterialError::Network(e.to_string()))?;
        let body: UploadBody = response
            .json()
            .await
            .map_err(|e| MaterialError::InvalidResponse(e.to_string()))?;
        if body.errcode != 0 {
            return Err(MaterialError::Api {
                code: body.errcode,
                message: body.errmsg,
            });
        }
        if body.media_id.is_empty() {
            return Err(MaterialError::InvalidResponse(
                "upload response had no media_id".to_string(),
            ));
        }
        debug!(media_id = %body.media_id, "material uploaded");
        Ok(UploadedMaterial {
            media_id: body.media_id,
            url: body.url,
        })
    }
}

/// Content type by file extension, octet-stream when unknown
fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
