//! Run configuration
//!
//! One explicit configuration object, built at process start and passed by
//! reference into the resolver and dispatcher. Missing credentials fail
//! here, before any page is opened or any platform touched.

use std::path::PathBuf;
use std::time::Duration;

use crosspub_collab::AspectRatio;

use crate::error::{Error, Result};
use crate::markdown::DEFAULT_KEYWORDS;

/// Document-store account credentials
#[derive(Debug, Clone)]
pub struct DingTalkCredentials {
    /// Application key
    pub app_key: String,
    /// Application secret
    pub app_secret: String,
    /// Operator user id
    pub user_id: String,
}

/// Publishing-platform account credentials
#[derive(Debug, Clone)]
pub struct WechatCredentials {
    /// Official-account AppID
    pub app_id: String,
    /// Official-account AppSecret
    pub app_secret: String,
}

/// Everything one publishing run needs to know
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Document-store credentials
    pub dingtalk: DingTalkCredentials,
    /// Publishing-platform credentials
    pub wechat: WechatCredentials,
    /// Where generated artifacts and the run report land
    pub results_dir: PathBuf,
    /// Browser profile directory for the automation session
    pub user_data_dir: PathBuf,
    /// Whether markdown cleanup writes backup files
    pub backup_markdown: bool,
    /// Keywords removed from fetched markdown
    pub clean_keywords: Vec<String>,
    /// Summary character budget
    pub summary_limit: usize,
    /// Short-title character threshold
    pub short_title_limit: usize,
    /// Cover image byte budget
    pub cover_budget_bytes: u64,
    /// Aspect ratio for generated covers
    pub cover_ratio: AspectRatio,
    /// Bounded wait for each collaborator reply
    pub reply_timeout: Duration,
    /// Attempts per generation step
    pub generation_attempts: u32,
}

const DEFAULT_SUMMARY_LIMIT: usize = 120;
const DEFAULT_SHORT_TITLE_LIMIT: usize = 20;
const DEFAULT_COVER_BUDGET: u64 = 5 * 1024 * 1024;
const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(120);

impl AppConfig {
    /// Build a configuration from explicit credentials and defaults
    #[must_use]
    pub fn new(dingtalk: DingTalkCredentials, wechat: WechatCredentials) -> Self {
        Self {
            dingtalk,
            wechat,
            results_dir: PathBuf::from("results"),
            user_data_dir: PathBuf::from("browser-data"),
            backup_markdown: true,
            clean_keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            short_title_limit: DEFAULT_SHORT_TITLE_LIMIT,
            cover_budget_bytes: DEFAULT_COVER_BUDGET,
            cover_ratio: AspectRatio::Widescreen,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            generation_attempts: 2,
        }
    }

    /// Build a configuration from environment variables
    ///
    /// Credentials are required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let dingtalk = DingTalkCredentials {
            app_key: require_env("DINGTALK_APP_KEY")?,
            app_secret: require_env("DINGTALK_APP_SECRET")?,
            user_id: require_env("DINGTALK_USER_ID")?,
        };
        let wechat = WechatCredentials {
            app_id: require_env("WECHAT_APP_ID")?,
            app_secret: require_env("WECHAT_APP_SECRET")?,
        };

        let mut config = Self::new(dingtalk, wechat);
        if let Ok(dir) = std::env::var("CROSSPUB_RESULTS_DIR") {
            config.results_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("CROSSPUB_USER_DATA_DIR") {
            config.user_data_dir = PathBuf::from(dir);
        }
        if let Ok(flag) = std::env::var("CROSSPUB_MARKDOWN_BACKUP") {
            config.backup_markdown = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        if let Some(limit) = parse_env("CROSSPUB_SUMMARY_LIMIT") {
            config.summary_limit = limit;
        }
        if let Some(secs) = parse_env("CROSSPUB_REPLY_TIMEOUT_SECS") {
            config.reply_timeout = Duration::from_secs(secs);
        }
        if let Ok(ratio) = std::env::var("CROSSPUB_COVER_RATIO") {
            config.cover_ratio = AspectRatio::parse_lenient(&ratio);
        }
        Ok(config)
    }

    /// Set the results directory
    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set the browser profile directory
    #[must_use]
    pub fn with_user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = dir.into();
        self
    }

    /// Enable or disable markdown backup files
    #[must_use]
    pub fn with_markdown_backup(mut self, backup: bool) -> Self {
        self.backup_markdown = backup;
        self
    }

    /// Set the summary character budget
    #[must_use]
    pub fn with_summary_limit(mut self, limit: usize) -> Self {
        self.summary_limit = limit;
        self
    }

    /// Set the bounded wait for collaborator replies
    #[must_use]
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Set the attempts per generation step
    #[must_use]
    pub fn with_generation_attempts(mut self, attempts: u32) -> Self {
        self.generation_attempts = attempts;
        self
    }
}

fn require_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Credential { name }),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
