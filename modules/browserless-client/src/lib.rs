pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

/// Default navigation deadline for full page loads.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Shorter deadline for DOM queries against an already-loaded page.
pub const DEFAULT_EVALUATE_TIMEOUT: Duration = Duration::from_secs(8);

/// Per-request render options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Hard deadline for the whole render round-trip.
    pub timeout: Duration,
    /// Viewport to emulate before evaluating, when set.
    pub viewport: Option<(u32, u32)>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_NAVIGATION_TIMEOUT,
            viewport: None,
        }
    }
}

impl RenderOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            viewport: None,
        }
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some((width, height));
        self
    }
}

/// Rendered page content plus the end-to-end load time, measured around
/// the whole round-trip so it reflects what a visitor would wait for.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub load_time: Duration,
}

#[derive(Deserialize)]
struct FunctionResponse {
    data: serde_json::Value,
}

/// Client for a Browserless-compatible rendering service.
///
/// `/content` returns fully-rendered HTML after script execution;
/// `/function` runs a JS expression against the loaded page and returns
/// its JSON value — the escape hatch for computed-layout checks
/// (overflow, scroll width) that static markup can't answer.
pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        // No client-wide timeout: each call sets its own deadline.
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let mut endpoint = format!("{}{}", self.base_url, path);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    /// Fetch fully-rendered HTML for a URL via the /content endpoint.
    pub async fn content(&self, url: &str, opts: &RenderOptions) -> Result<RenderedPage> {
        let body = serde_json::json!({
            "url": url,
            "gotoOptions": {
                "timeout": opts.timeout.as_millis() as u64,
                "waitUntil": "load",
            },
        });

        let started = Instant::now();
        let resp = self
            .client
            .post(self.endpoint("/content"))
            .timeout(opts.timeout)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| annotate_timeout(e, opts.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let html = resp
            .text()
            .await
            .map_err(|e| annotate_timeout(e, opts.timeout))?;
        let load_time = started.elapsed();
        debug!(url, load_ms = load_time.as_millis() as u64, "Rendered page content");

        Ok(RenderedPage { html, load_time })
    }

    /// Evaluate a JS expression against the loaded page via /function.
    ///
    /// The expression runs in page context after navigation completes (and
    /// after viewport emulation when requested); its value comes back as
    /// JSON. Expressions must be self-contained — no `await` at top level.
    pub async fn evaluate(
        &self,
        url: &str,
        expression: &str,
        opts: &RenderOptions,
    ) -> Result<serde_json::Value> {
        // Browserless /function: uploaded code drives the page session.
        const FUNCTION_CODE: &str = r#"
export default async function ({ page, context }) {
    if (context.viewport) {
        await page.setViewport(context.viewport);
    }
    await page.goto(context.url, { waitUntil: "load", timeout: context.timeout });
    if (context.settleMs) {
        await new Promise((resolve) => setTimeout(resolve, context.settleMs));
    }
    const value = await page.evaluate(context.expression);
    return { data: { data: value }, type: "application/json" };
}
"#;

        let viewport = opts.viewport.map(|(width, height)| {
            serde_json::json!({ "width": width, "height": height })
        });
        let body = serde_json::json!({
            "code": FUNCTION_CODE,
            "context": {
                "url": url,
                "expression": expression,
                "timeout": opts.timeout.as_millis() as u64,
                // Let layout settle after a viewport change.
                "settleMs": if viewport.is_some() { 500 } else { 0 },
                "viewport": viewport,
            },
        });

        let resp = self
            .client
            .post(self.endpoint("/function"))
            .timeout(opts.timeout + Duration::from_secs(2))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| annotate_timeout(e, opts.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp
            .text()
            .await
            .map_err(|e| annotate_timeout(e, opts.timeout))?;
        let parsed: FunctionResponse = serde_json::from_str(&text)
            .map_err(|_| BrowserlessError::BadPayload(truncate(&text, 200)))?;

        Ok(parsed.data)
    }
}

fn annotate_timeout(err: reqwest::Error, deadline: Duration) -> BrowserlessError {
    if err.is_timeout() {
        BrowserlessError::Timeout(deadline.as_millis() as u64)
    } else {
        err.into()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…")
    }
}
