//! Pipeline - stage sequencing and operator checkpoints
//!
//! One run is strictly sequential: resolve content (summary validation
//! included), prepare assets, dispatch, report. After each major stage the
//! operator gets a continue/abort checkpoint; declining before dispatch
//! aborts the run, declining after dispatch only skips the report artifact.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crosspub_automation::BrowserSession;
use crosspub_collab::{AiCollaborator, DocumentSource};

use crate::artifacts::{base_name, ArtifactStore};
use crate::config::AppConfig;
use crate::content::ResolvedContent;
use crate::cover::{fit_cover, MAX_ATTEMPTS, SCALE_STEP};
use crate::dispatch::{Dispatcher, PlatformAdapter, PublishOutcome};
use crate::error::{Error, Result};
use crate::request::PublishRequest;
use crate::resolve::ContentResolver;

/// The pause points where the operator can abort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    /// All fields resolved and validated
    ContentResolved,
    /// Cover fitted to its byte budget
    AssetsReady,
    /// All platforms attempted
    Dispatched,
}

impl Checkpoint {
    /// Human-readable stage name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentResolved => "content resolution",
            Self::AssetsReady => "asset preparation",
            Self::Dispatched => "dispatch",
        }
    }
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator continue/abort decisions at checkpoints
#[async_trait::async_trait]
pub trait OperatorGate: Send + Sync {
    /// Whether to continue past `checkpoint`
    async fn confirm(&self, checkpoint: Checkpoint) -> bool;
}

/// Gate that always continues (unattended runs, tests)
pub struct AutoContinue;

#[async_trait::async_trait]
impl OperatorGate for AutoContinue {
    async fn confirm(&self, _checkpoint: Checkpoint) -> bool {
        true
    }
}

/// What one completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// The content that was published
    pub content: ResolvedContent,
    /// One outcome per requested platform, in request order
    pub outcomes: Vec<PublishOutcome>,
    /// Whether the cover ended up within its byte budget (absent without a
    /// cover)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_within_budget: Option<bool>,
}

/// The whole publish run, wired once at startup
pub struct PublishPipeline<'a> {
    config: &'a AppConfig,
    ai: &'a dyn AiCollaborator,
    docs: &'a dyn DocumentSource,
    session: &'a dyn BrowserSession,
    adapters: Vec<Arc<dyn PlatformAdapter>>,
    gate: &'a dyn OperatorGate,
}

impl<'a> PublishPipeline<'a> {
    /// Wire a pipeline over the run's collaborators and adapters
    #[must_use]
    pub fn new(
        config: &'a AppConfig,
        ai: &'a dyn AiCollaborator,
        docs: &'a dyn DocumentSource,
        session: &'a dyn BrowserSession,
        adapters: Vec<Arc<dyn PlatformAdapter>>,
        gate: &'a dyn OperatorGate,
    ) -> Self {
        Self {
            config,
            ai,
            docs,
            session,
            adapters,
            gate,
        }
    }

    /// Run the full pipeline for one request
    ///
    /// `Ok` means the run completed and every requested platform has an
    /// outcome; `Err` means it aborted before dispatch could begin.
    pub async fn run(&self, request: &PublishRequest) -> Result<PipelineReport> {
        let store = ArtifactStore::new(&self.config.results_dir);
        store.ensure()?;

        let dispatcher = Dispatcher::new(self.adapters.clone());
        let required = dispatcher.critical_fields();
        info!(?required, "resolving content");
        let resolver = ContentResolver::new(self.config, self.ai, self.docs, &store);
        let mut content = resolver.resolve(request, &required).await?;
        self.checkpoint(Checkpoint::ContentResolved).await?;

        let mut cover_within_budget = None;
        if let Some(cover) = content.cover.clone() {
            let fitted = fit_cover(
                &cover,
                self.config.cover_budget_bytes,
                SCALE_STEP,
                MAX_ATTEMPTS,
            )?;
            if !fitted.within_budget {
                warn!(
                    bytes = fitted.bytes,
                    budget = self.config.cover_budget_bytes,
                    "cover still over budget; platforms may reject it"
                );
            }
            cover_within_budget = Some(fitted.within_budget);
            content.cover = Some(fitted.path);
        }
        self.checkpoint(Checkpoint::AssetsReady).await?;

        let outcomes = dispatcher.dispatch(self.session, &content).await;
        let base = base_name(content.markdown.as_deref(), &content.title);
        let report = PipelineReport {
            content,
            outcomes,
            cover_within_budget,
        };

        if self.gate.confirm(Checkpoint::Dispatched).await {
            let path = store.save_report(&base, &report)?;
            info!(report = %path.display(), "run report written");
        } else {
            warn!("operator declined the final checkpoint; report not written");
        }
        Ok(report)
    }

    async fn checkpoint(&self, checkpoint: Checkpoint) -> Result<()> {
        if self.gate.confirm(checkpoint).await {
            info!(%checkpoint, "operator continued");
            Ok(())
        } else {
            Err(Error::Aborted { checkpoint })
        }
    }
}
