//! Seams between the pipeline and its I/O collaborators. Production
//! implementations live in `renderer.rs` / `directory.rs` and the client
//! crates; tests swap in the fakes from `testing.rs`.

use std::time::Duration;

use async_trait::async_trait;
use vetrina_common::VetrinaError;

/// A business discovered from the directory source, prior to
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    /// Whatever the directory listing carried in its "website" slot.
    pub raw_site: Option<String>,
}

/// One search hit, in the order the engine returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

/// Rendered DOM state for a URL plus the end-to-end load time.
#[derive(Debug, Clone)]
pub struct RenderedSite {
    pub html: String,
    pub load_time: Duration,
}

/// Page access requiring script execution: full renders and computed-layout
/// evaluation. Render sessions are scarce — implementations bound their own
/// concurrency.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigate and return the rendered DOM after scripts ran.
    async fn render(&self, url: &str) -> Result<RenderedSite, VetrinaError>;

    /// Evaluate a JS expression against the loaded page, optionally under
    /// an emulated viewport. The escape hatch for overflow/scroll-width
    /// checks that static markup can't answer.
    async fn evaluate(
        &self,
        url: &str,
        expression: &str,
        viewport: Option<(u32, u32)>,
    ) -> Result<serde_json::Value, VetrinaError>;
}

/// Raw response text for signals that only need static markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, VetrinaError>;
}

/// External search capability consumed by the fallback resolver.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<SearchHit>, VetrinaError>;
}

/// Paginated directory listing walker.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Candidates on the given 1-based page. `Ok(None)` signals the end of
    /// pagination; each business appears once per page visited.
    async fn page(&self, page: u32) -> Result<Option<Vec<Candidate>>, VetrinaError>;
}

#[async_trait]
impl WebSearcher for ddg_client::DdgClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, VetrinaError> {
        let hits = ddg_client::DdgClient::search(self, query, max_results)
            .await
            .map_err(|e| VetrinaError::SearchProvider(e.to_string()))?;

        Ok(hits
            .into_iter()
            .map(|h| SearchHit {
                title: h.title,
                url: h.url,
            })
            .collect())
    }
}
