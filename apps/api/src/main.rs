mod config;
mod errors;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod tailoring;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{ChatModel, LlmClient};
use crate::render::{ChromiumRenderer, HtmlRenderer, RenderPipeline};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    let llm: Option<Arc<dyn ChatModel>> = match &config.openai_api_key {
        Some(key) => {
            let client: Arc<dyn ChatModel> = Arc::new(LlmClient::new(key.clone())?);
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("OPENAI_API_KEY is not set. Requests to /api/tailor will fail.");
            None
        }
    };

    let templates = Arc::new(HtmlRenderer::new().context("failed to compile resume templates")?);

    // The browser itself is located on the first render, not here.
    let browser = Arc::new(ChromiumRenderer::new(
        config.chrome_path.clone(),
        config.render_timeout,
    ));
    let render_pipeline = Arc::new(RenderPipeline::standard(browser));
    info!(
        timeout_secs = config.render_timeout.as_secs(),
        public_dir = %config.public_dir.display(),
        "render pipeline ready"
    );

    let state = AppState {
        config: config.clone(),
        llm,
        templates,
        render_pipeline,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Resume builder running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
