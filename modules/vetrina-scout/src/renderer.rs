//! Production page-access implementations: Browserless-backed rendering
//! and a plain reqwest fetcher for static-markup checks.

use std::time::Duration;

use async_trait::async_trait;
use browserless_client::{BrowserlessClient, BrowserlessError, RenderOptions};
use tokio::sync::Semaphore;
use tracing::info;
use vetrina_common::VetrinaError;

use crate::traits::{PageFetcher, PageRenderer, RenderedSite};

/// Deadline for DOM-query evaluations (page already known to load).
const EVALUATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for full navigations.
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(20);

fn map_render_error(url: &str, e: BrowserlessError) -> VetrinaError {
    if e.is_transient() {
        VetrinaError::TransientFetch(e.to_string())
    } else {
        VetrinaError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Renderer with a small session pool. Each render session is scarce on
/// the Browserless side, so fan-out is bounded here rather than at every
/// call site.
pub struct BrowserlessRenderer {
    client: BrowserlessClient,
    semaphore: Semaphore,
}

impl BrowserlessRenderer {
    pub fn new(base_url: &str, token: Option<&str>, max_sessions: usize) -> Self {
        info!(base_url, max_sessions, "Using BrowserlessRenderer");
        Self {
            client: BrowserlessClient::new(base_url, token),
            semaphore: Semaphore::new(max_sessions),
        }
    }
}

#[async_trait]
impl PageRenderer for BrowserlessRenderer {
    async fn render(&self, url: &str) -> Result<RenderedSite, VetrinaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| VetrinaError::TransientFetch("render pool closed".to_string()))?;

        let opts = RenderOptions::with_timeout(NAVIGATION_TIMEOUT);
        let page = self
            .client
            .content(url, &opts)
            .await
            .map_err(|e| map_render_error(url, e))?;

        info!(
            url,
            bytes = page.html.len(),
            load_ms = page.load_time.as_millis() as u64,
            "Rendered page"
        );

        Ok(RenderedSite {
            html: page.html,
            load_time: page.load_time,
        })
    }

    async fn evaluate(
        &self,
        url: &str,
        expression: &str,
        viewport: Option<(u32, u32)>,
    ) -> Result<serde_json::Value, VetrinaError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| VetrinaError::TransientFetch("render pool closed".to_string()))?;

        let mut opts = RenderOptions::with_timeout(EVALUATE_TIMEOUT);
        if let Some((w, h)) = viewport {
            opts = opts.viewport(w, h);
        }

        self.client
            .evaluate(url, expression, &opts)
            .await
            .map_err(|e| map_render_error(url, e))
    }
}

/// Raw HTTP fetcher for checks that only need static markup (the
/// resolver's content-plausibility pass).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, VetrinaError> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| VetrinaError::TransientFetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VetrinaError::Navigation {
                url: url.to_string(),
                message: format!("status {status}"),
            });
        }

        resp.text()
            .await
            .map_err(|e| VetrinaError::TransientFetch(e.to_string()))
    }
}
