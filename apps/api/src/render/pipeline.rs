//! Render chain — tries each strategy in order and keeps the first PDF produced.
//!
//! Standard order: browser render of the HTML, then the manual append onto the
//! uploaded document, then the uploaded bytes unchanged.
//!
//! `RenderPipeline` holds a `Vec<Box<dyn RenderStrategy>>`, so tests can swap
//! in stubs without touching the handler.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::ResumeData;
use crate::render::browser::ChromiumRenderer;
use crate::render::fallback::append_tailored_resume_to_pdf;
use crate::render::RenderError;

/// Which strategy produced the final PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTier {
    Html,
    Fallback,
    Original,
}

/// Inputs shared by every strategy for one request.
#[derive(Debug, Clone, Default)]
pub struct RenderJob {
    pub html: Option<String>,
    pub resume: ResumeData,
    pub original: Option<Bytes>,
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub tier: RenderTier,
    pub pdf: Vec<u8>,
}

#[async_trait]
pub trait RenderStrategy: Send + Sync {
    fn tier(&self) -> RenderTier;

    async fn render(&self, job: &RenderJob) -> Result<Vec<u8>, RenderError>;
}

/// Prints the rendered HTML through the headless browser.
pub struct HtmlPdfStrategy {
    browser: Arc<ChromiumRenderer>,
}

impl HtmlPdfStrategy {
    pub fn new(browser: Arc<ChromiumRenderer>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl RenderStrategy for HtmlPdfStrategy {
    fn tier(&self) -> RenderTier {
        RenderTier::Html
    }

    async fn render(&self, job: &RenderJob) -> Result<Vec<u8>, RenderError> {
        let html = job
            .html
            .as_deref()
            .ok_or_else(|| RenderError::Browser("no HTML was rendered for this job".to_string()))?;
        self.browser.render_pdf(html).await
    }
}

/// Appends the tailored sections to the uploaded document on a blocking thread.
pub struct AppendStrategy;

#[async_trait]
impl RenderStrategy for AppendStrategy {
    fn tier(&self) -> RenderTier {
        RenderTier::Fallback
    }

    async fn render(&self, job: &RenderJob) -> Result<Vec<u8>, RenderError> {
        let original = job.original.clone();
        let resume = job.resume.clone();
        tokio::task::spawn_blocking(move || {
            append_tailored_resume_to_pdf(original.as_deref(), &resume)
        })
        .await
        .map_err(|e| RenderError::Join(e.to_string()))?
    }
}

/// Returns the uploaded bytes untouched.
pub struct PassthroughStrategy;

#[async_trait]
impl RenderStrategy for PassthroughStrategy {
    fn tier(&self) -> RenderTier {
        RenderTier::Original
    }

    async fn render(&self, job: &RenderJob) -> Result<Vec<u8>, RenderError> {
        job.original
            .as_ref()
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| bytes.to_vec())
            .ok_or(RenderError::MissingOriginal)
    }
}

pub struct RenderPipeline {
    strategies: Vec<Box<dyn RenderStrategy>>,
}

impl RenderPipeline {
    /// Browser → append → passthrough.
    pub fn standard(browser: Arc<ChromiumRenderer>) -> Self {
        Self::with_strategies(vec![
            Box::new(HtmlPdfStrategy::new(browser)),
            Box::new(AppendStrategy),
            Box::new(PassthroughStrategy),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn RenderStrategy>>) -> Self {
        Self { strategies }
    }

    /// Runs strategies in order. Returns the first success, or the last error
    /// when every strategy failed.
    pub async fn run(&self, job: &RenderJob) -> Result<RenderOutcome, RenderError> {
        let mut last_error = None;

        for strategy in &self.strategies {
            let tier = strategy.tier();
            match strategy.render(job).await {
                Ok(pdf) => {
                    info!(?tier, size_kb = pdf.len() / 1024, "render succeeded");
                    return Ok(RenderOutcome { tier, pdf });
                }
                Err(e) => {
                    warn!(?tier, error = %e, "render strategy failed, degrading");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(RenderError::NoStrategies))
    }
}
