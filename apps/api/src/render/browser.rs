//! Headless Chromium HTML → PDF renderer.
//!
//! The browser executable is resolved lazily on first use and cached for the
//! life of the process; every render then spawns a short-lived headless process
//! against a temp file. Page size and margins come from the template's `@page` rule.
//! There is no retry: a failed or timed-out render is handed back to the caller,
//! which falls through to the next render tier.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::render::RenderError;

/// Executable names searched for on `PATH` when no explicit path is configured.
const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// A located browser executable.
#[derive(Debug, Clone)]
pub struct BrowserHandle {
    executable: PathBuf,
}

impl BrowserHandle {
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn locate(configured: Option<&Path>) -> Result<Self, RenderError> {
        if let Some(path) = configured {
            return if path.is_file() {
                Ok(Self {
                    executable: path.to_path_buf(),
                })
            } else {
                Err(RenderError::Browser(format!(
                    "configured browser {} does not exist",
                    path.display()
                )))
            };
        }

        let search_path = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&search_path)
            .flat_map(|dir| BROWSER_CANDIDATES.iter().map(move |name| dir.join(name)))
            .find(|candidate| candidate.is_file())
            .map(|executable| Self { executable })
            .ok_or_else(|| RenderError::Browser("no headless browser found on PATH".to_string()))
    }
}

/// Renders HTML to PDF bytes with a headless browser.
///
/// Cheap to clone; clones share the lazily-resolved handle.
#[derive(Clone)]
pub struct ChromiumRenderer {
    configured_path: Option<PathBuf>,
    timeout: Duration,
    handle: Arc<OnceCell<BrowserHandle>>,
}

impl ChromiumRenderer {
    pub fn new(configured_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            configured_path,
            timeout,
            handle: Arc::new(OnceCell::new()),
        }
    }

    /// Resolves the browser on first call and reuses it afterwards.
    pub async fn handle(&self) -> Result<&BrowserHandle, RenderError> {
        self.handle
            .get_or_try_init(|| async {
                let located = BrowserHandle::locate(self.configured_path.as_deref());
                if let Ok(handle) = &located {
                    info!(browser = %handle.executable.display(), "headless browser resolved");
                }
                located
            })
            .await
    }

    pub async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        if html.trim().is_empty() {
            return Err(RenderError::Browser("HTML content is required to render a PDF".to_string()));
        }
        let browser = self.handle().await?;

        let workdir = tempfile::tempdir()?;
        let html_path = workdir.path().join("resume.html");
        let pdf_path = workdir.path().join("resume.pdf");
        tokio::fs::write(&html_path, html).await?;

        let mut command = Command::new(browser.executable());
        command
            .arg("--headless=new")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-gpu")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", html_path.display()))
            .kill_on_drop(true);

        debug!(?command, "running headless browser");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Browser(format!(
                "browser exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let pdf = tokio::fs::read(&pdf_path).await?;
        if pdf.is_empty() {
            return Err(RenderError::Browser("browser produced an empty PDF".to_string()));
        }

        info!(size_kb = pdf.len() / 1024, "browser PDF generated");
        Ok(pdf)
    }
}
