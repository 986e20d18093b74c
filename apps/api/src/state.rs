use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::render::{HtmlRenderer, RenderPipeline};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no API key is configured; tailoring requests then fail with 500.
    pub llm: Option<Arc<dyn ChatModel>>,
    pub templates: Arc<HtmlRenderer>,
    /// Browser → append → passthrough. The browser handle inside is process-wide.
    pub render_pipeline: Arc<RenderPipeline>,
}
