//! Platform dispatch
//!
//! The dispatcher walks the requested platforms in order over the single
//! automation session, one adapter and one page per platform. Failures are
//! isolated: an adapter error is recorded and the next platform still runs.
//! A platform whose required fields never resolved is recorded as skipped
//! without its adapter being invoked.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crosspub_automation::BrowserSession;

use crate::content::{Field, ResolvedContent};
use crate::error::Error;
use crate::tags::allocate;

/// A known publishing destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// WeChat official account
    Wechat,
    /// Zhihu
    Zhihu,
    /// CSDN
    Csdn,
    /// Xiaohongshu
    Xiaohongshu,
    /// Douyin
    Douyin,
    /// Kuaishou
    Kuaishou,
    /// 51CTO
    Cto51,
}

impl Platform {
    /// Every known platform, in the default dispatch order
    pub const ALL: [Platform; 7] = [
        Platform::Wechat,
        Platform::Zhihu,
        Platform::Csdn,
        Platform::Xiaohongshu,
        Platform::Douyin,
        Platform::Kuaishou,
        Platform::Cto51,
    ];

    /// The platform's string key
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wechat => "wechat",
            Self::Zhihu => "zhihu",
            Self::Csdn => "csdn",
            Self::Xiaohongshu => "xiaohongshu",
            Self::Douyin => "douyin",
            Self::Kuaishou => "kuaishou",
            Self::Cto51 => "51cto",
        }
    }

    /// Maximum tags the platform accepts; `None` means unbounded
    #[must_use]
    pub fn tag_limit(&self) -> Option<usize> {
        match self {
            Self::Zhihu => Some(3),
            Self::Csdn => Some(10),
            Self::Xiaohongshu => Some(10),
            Self::Douyin => Some(5),
            Self::Kuaishou => Some(4),
            Self::Cto51 => Some(5),
            Self::Wechat => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "wechat" => Ok(Self::Wechat),
            "zhihu" => Ok(Self::Zhihu),
            "csdn" => Ok(Self::Csdn),
            "xiaohongshu" => Ok(Self::Xiaohongshu),
            "douyin" => Ok(Self::Douyin),
            "kuaishou" => Ok(Self::Kuaishou),
            "51cto" | "cto51" => Ok(Self::Cto51),
            other => Err(Error::UnknownPlatform(other.to_string())),
        }
    }
}

impl Serialize for Platform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error from one adapter invocation; recorded, never propagated
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Automation driver failure during the platform's page flow
    #[error("automation error: {0}")]
    Automation(#[from] crosspub_automation::Error),

    /// The platform's own API rejected a step
    #[error("platform api error: {0}")]
    Api(String),

    /// The platform signalled a rejection in its UI
    #[error("platform rejected the submission: {0}")]
    Rejected(String),
}

/// Result type alias for adapter invocations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// One platform's publishing flow
#[async_trait::async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Which platform this adapter serves
    fn platform(&self) -> Platform;

    /// Fields this platform cannot publish without
    fn required_fields(&self) -> &'static [Field];

    /// Submit `content` (with `tags` already allocated) to the platform
    async fn publish(
        &self,
        session: &dyn BrowserSession,
        content: &ResolvedContent,
        tags: &[String],
    ) -> AdapterResult<()>;
}

/// Outcome status for one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The adapter completed its flow
    Succeeded,
    /// The adapter failed; detail carries the error
    Failed,
    /// A required field never resolved; the adapter was not invoked
    Skipped,
}

/// The per-platform record dispatch produces
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    /// Platform identifier
    pub platform: Platform,
    /// What happened
    pub status: OutcomeStatus,
    /// Error or skip reason; absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl PublishOutcome {
    fn succeeded(platform: Platform) -> Self {
        Self {
            platform,
            status: OutcomeStatus::Succeeded,
            detail: None,
        }
    }

    fn failed(platform: Platform, error: &AdapterError) -> Self {
        Self {
            platform,
            status: OutcomeStatus::Failed,
            detail: Some(error.to_string()),
        }
    }

    fn skipped(platform: Platform, missing: &[Field]) -> Self {
        let names: Vec<&str> = missing.iter().map(Field::as_str).collect();
        Self {
            platform,
            status: OutcomeStatus::Skipped,
            detail: Some(format!("unresolved: {}", names.join(", "))),
        }
    }
}

/// Walks the adapters in order, collecting one outcome each
pub struct Dispatcher {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
}

impl Dispatcher {
    /// Create a dispatcher over an ordered adapter list
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn PlatformAdapter>>) -> Self {
        Self { adapters }
    }

    /// Fields every adapter requires
    ///
    /// Failing to resolve one of these leaves nothing publishable, so the
    /// resolver treats them as fatal. A field only some adapters need is
    /// not in this set; those adapters get skipped instead.
    #[must_use]
    pub fn critical_fields(&self) -> Vec<Field> {
        let Some(first) = self.adapters.first() else {
            return Vec::new();
        };
        first
            .required_fields()
            .iter()
            .copied()
            .filter(|field| {
                self.adapters
                    .iter()
                    .all(|adapter| adapter.required_fields().contains(field))
            })
            .collect()
    }

    /// Publish `content` to every adapter, in order
    ///
    /// Always returns exactly one outcome per adapter, in adapter order,
    /// whatever individual adapters do.
    pub async fn dispatch(
        &self,
        session: &dyn BrowserSession,
        content: &ResolvedContent,
    ) -> Vec<PublishOutcome> {
        let mut outcomes = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let platform = adapter.platform();
            let missing = content.missing(adapter.required_fields());
            if !missing.is_empty() {
                warn!(%platform, ?missing, "skipping platform, required fields unresolved");
                outcomes.push(PublishOutcome::skipped(platform, &missing));
                continue;
            }

            let tags = allocate(&content.tags, platform);
            info!(%platform, tags = tags.len(), "publishing");
            match adapter.publish(session, content, &tags).await {
                Ok(()) => {
                    info!(%platform, "published");
                    outcomes.push(PublishOutcome::succeeded(platform));
                }
                Err(err) => {
                    warn!(%platform, %err, "platform failed, continuing with the rest");
                    outcomes.push(PublishOutcome::failed(platform, &err));
                }
            }
        }
        outcomes
    }
}
