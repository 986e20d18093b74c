// Document rendering: HTML templates, the headless-browser PDF step, the manual
// append fallback, and the chain that degrades between them.
// Only a missing original document is a hard failure; every other error is
// logged and the next tier is tried.

pub mod browser;
pub mod fallback;
pub mod html;
pub mod pipeline;

use thiserror::Error;

pub use browser::ChromiumRenderer;
pub use html::{HtmlRenderer, ResumeTemplate};
pub use pipeline::{RenderJob, RenderPipeline, RenderTier};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("original document bytes are required to append a tailored resume")]
    MissingOriginal,

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("browser render failed: {0}")]
    Browser(String),

    #[error("browser render timed out after {0}s")]
    Timeout(u64),

    #[error("render task failed: {0}")]
    Join(String),

    #[error("no render strategy configured")]
    NoStrategies,
}
