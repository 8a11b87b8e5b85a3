//! Remote - HTTP client for the driver sidecar
//!
//! The real page interactions are performed by an external automation driver
//! (a sidecar process that owns the browser profile). This module is the
//! client half: a thin JSON-over-HTTP wrapper that implements the
//! [`BrowserSession`] / [`PageDriver`] traits against it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::session::{BrowserSession, PageDriver};

/// Default sidecar endpoint
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4444";

/// Slack added on top of a command's own wait so the HTTP call does not give
/// up before the driver does
const REQUEST_SLACK: Duration = Duration::from_secs(30);

/// Driver sidecar configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the driver sidecar
    pub base_url: String,
    /// Per-command HTTP timeout for commands without their own wait
    pub request_timeout: Duration,
    /// Browser profile directory the sidecar should use
    pub user_data_dir: Option<PathBuf>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
            user_data_dir: None,
        }
    }
}

impl RemoteConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CROSSPUB_DRIVER_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Set the sidecar base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the browser profile directory
    #[must_use]
    pub fn with_user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct OpenedPage {
    page: String,
}

#[derive(Debug, Deserialize)]
struct ClipboardBody {
    text: String,
}

#[derive(Debug, Deserialize)]
struct DownloadsBody {
    files: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct DriverFailure {
    error: String,
    #[serde(default)]
    timeout: bool,
}

#[derive(Debug, Serialize)]
struct Command<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    locator: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

impl<'a> Command<'a> {
    fn new(action: &'a str) -> Self {
        Self {
            action,
            locator: None,
            value: None,
            timeout_ms: None,
        }
    }

    fn locator(mut self, locator: &'a str) -> Self {
        self.locator = Some(locator);
        self
    }

    fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }
}

/// Session backed by the driver sidecar
pub struct RemoteSession {
    client: Client,
    config: RemoteConfig,
}

impl RemoteSession {
    /// Connect to the sidecar and verify it answers
    pub async fn connect(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout + REQUEST_SLACK)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let session = Self { client, config };
        session.status().await?;
        Ok(session)
    }

    /// Ask the sidecar whether it is alive
    pub async fn status(&self) -> Result<()> {
        let url = format!("{}/status", self.config.base_url);
        let response = self.client.get(&url).send().await.map_err(map_transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Driver(format!(
                "driver returned status {}",
                response.status()
            )))
        }
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;
        Ok(response)
    }
}

fn map_transport(e: reqwest::Error) -> Error {
    if e.is_connect() {
        Error::Network(format!(
            "cannot reach the automation driver: {e}. Is the sidecar running?"
        ))
    } else if e.is_timeout() {
        Error::Network("driver request timed out".to_string())
    } else {
        Error::Network(e.to_string())
    }
}

async fn read_failure(response: reqwest::Response, what: &str, waited: Duration) -> Error {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<DriverFailure>(&body) {
        Ok(failure) if failure.timeout => Error::Timeout {
            what: what.to_string(),
            waited_ms: waited.as_millis() as u64,
        },
        Ok(failure) => Error::Driver(failure.error),
        Err(_) => Error::Driver(body),
    }
}

#[async_trait::async_trait]
impl BrowserSession for RemoteSession {
    async fn open(&self, url: &str) -> Result<Box<dyn PageDriver>> {
        debug!(url, "opening page through driver");
        let mut body = json!({ "url": url });
        if let Some(dir) = &self.config.user_data_dir {
            body["user_data_dir"] = json!(dir);
        }
        let response = self.post_json("/pages", body).await?;
        if !response.status().is_success() {
            return Err(read_failure(response, url, Duration::ZERO).await);
        }
        let opened: OpenedPage = response
            .json()
            .await
            .map_err(|e| Error::Driver(format!("malformed open response: {e}")))?;
        Ok(Box::new(RemotePage {
            client: self.client.clone(),
            base_url: self.config.base_url.clone(),
            page_id: opened.page,
        }))
    }
}

/// One page held open by the sidecar
pub struct RemotePage {
    client: Client,
    base_url: String,
    page_id: String,
}

impl RemotePage {
    async fn command(&self, command: Command<'_>) -> Result<reqwest::Response> {
        let url = format!("{}/pages/{}/command", self.base_url, self.page_id);
        debug!(page = %self.page_id, action = command.action, "driver command");
        self.client
            .post(&url)
            .json(&command)
            .send()
            .await
            .map_err(map_transport)
    }

    async fn run(&self, command: Command<'_>) -> Result<reqwest::Response> {
        let what = command
            .locator
            .unwrap_or(command.action)
            .to_string();
        let waited = command
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(Duration::ZERO);
        let response = self.command(command).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(read_failure(response, &what, waited).await)
        }
    }
}

#[async_trait::async_trait]
impl PageDriver for RemotePage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.run(Command::new("goto").value(url)).await?;
        Ok(())
    }

    async fn click(&mut self, locator: &str) -> Result<()> {
        self.run(Command::new("click").locator(locator)).await?;
        Ok(())
    }

    async fn fill(&mut self, locator: &str, text: &str) -> Result<()> {
        self.run(Command::new("fill").locator(locator).value(text))
            .await?;
        Ok(())
    }

    async fn press(&mut self, key: &str) -> Result<()> {
        self.run(Command::new("press").value(key)).await?;
        Ok(())
    }

    async fn upload(&mut self, trigger: &str, file: &Path) -> Result<()> {
        let file = file.to_string_lossy();
        self.run(Command::new("upload").locator(trigger).value(&file))
            .await?;
        Ok(())
    }

    async fn wait_visible(&mut self, locator: &str, timeout: Duration) -> Result<()> {
        self.run(Command::new("wait_visible").locator(locator).timeout(timeout))
            .await?;
        Ok(())
    }

    async fn text_of(&mut self, locator: &str) -> Result<String> {
        let response = self.run(Command::new("text").locator(locator)).await?;
        let body: ClipboardBody = response
            .json()
            .await
            .map_err(|e| Error::Driver(format!("malformed text response: {e}")))?;
        Ok(body.text)
    }

    async fn clipboard_text(&mut self) -> Result<String> {
        let response = self.run(Command::new("clipboard")).await?;
        let body: ClipboardBody = response
            .json()
            .await
            .map_err(|e| Error::Driver(format!("malformed clipboard response: {e}")))?;
        Ok(body.text)
    }

    async fn capture_downloads(
        &mut self,
        trigger: &str,
        dest_dir: &Path,
        timeout: Duration,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dest_dir)?;
        let dest = dest_dir.to_string_lossy();
        let response = self
            .run(
                Command::new("downloads")
                    .locator(trigger)
                    .value(&dest)
                    .timeout(timeout),
            )
            .await;
        match response {
            Ok(response) => {
                let body: DownloadsBody = response
                    .json()
                    .await
                    .map_err(|e| Error::Driver(format!("malformed downloads response: {e}")))?;
                Ok(body.files)
            }
            // No download starting within the wait is an empty result, not a fault
            Err(err) if err.is_timeout() => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }
}
