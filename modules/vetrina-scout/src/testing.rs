//! In-memory fakes for the pipeline's I/O seams. No network required.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use vetrina_common::VetrinaError;

use crate::traits::{
    Candidate, DirectorySource, PageFetcher, PageRenderer, RenderedSite, SearchHit, WebSearcher,
};

// --- Searcher ---

/// Returns a fixed hit list for every query, or errors on demand.
pub struct StaticSearcher {
    hits: Vec<SearchHit>,
    fail: bool,
}

impl StaticSearcher {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self { hits, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl WebSearcher for StaticSearcher {
    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, VetrinaError> {
        if self.fail {
            return Err(VetrinaError::SearchProvider("provider down".to_string()));
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

// --- Fetcher ---

/// Serves registered pages; unregistered URLs fail with a transient error.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str, _timeout: Duration) -> Result<String, VetrinaError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| VetrinaError::TransientFetch(format!("no page for {url}")))
    }
}

// --- Renderer ---

/// Scripted renderer: one page of HTML, a fixed load time, and canned
/// layout-probe outcomes keyed by what the probe expression inspects.
pub struct FakeRenderer {
    html: String,
    load_time: Duration,
    fail_navigation: bool,
    no_overflow: bool,
    media_query: bool,
    scroll_free_viewports: usize,
    remaining_media_failures: Mutex<u32>,
    media_query_calls: Mutex<u32>,
    scroll_calls: Mutex<usize>,
}

impl FakeRenderer {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            load_time: Duration::from_millis(100),
            fail_navigation: false,
            no_overflow: false,
            media_query: false,
            scroll_free_viewports: 0,
            remaining_media_failures: Mutex::new(0),
            media_query_calls: Mutex::new(0),
            scroll_calls: Mutex::new(0),
        }
    }

    pub fn failing_navigation() -> Self {
        let mut r = Self::new("");
        r.fail_navigation = true;
        r
    }

    pub fn with_load_time(mut self, load_time: Duration) -> Self {
        self.load_time = load_time;
        self
    }

    pub fn with_all_layout_probes(self, pass: bool) -> Self {
        let viewports = if pass { 3 } else { 0 };
        self.with_layout_probes(pass, pass, viewports)
    }

    pub fn with_layout_probes(
        mut self,
        no_overflow: bool,
        media_query: bool,
        scroll_free_viewports: usize,
    ) -> Self {
        self.no_overflow = no_overflow;
        self.media_query = media_query;
        self.scroll_free_viewports = scroll_free_viewports;
        self
    }

    /// Make the media-query probe fail transiently this many times before
    /// answering.
    pub fn with_transient_media_query_failures(self, n: u32) -> Self {
        *self.remaining_media_failures.lock().unwrap() = n;
        self
    }

    pub fn media_query_calls(&self) -> u32 {
        *self.media_query_calls.lock().unwrap()
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn render(&self, url: &str) -> Result<RenderedSite, VetrinaError> {
        if self.fail_navigation {
            return Err(VetrinaError::Navigation {
                url: url.to_string(),
                message: "navigation never reached a usable state".to_string(),
            });
        }
        Ok(RenderedSite {
            html: self.html.clone(),
            load_time: self.load_time,
        })
    }

    async fn evaluate(
        &self,
        url: &str,
        expression: &str,
        _viewport: Option<(u32, u32)>,
    ) -> Result<serde_json::Value, VetrinaError> {
        if self.fail_navigation {
            return Err(VetrinaError::Navigation {
                url: url.to_string(),
                message: "navigation never reached a usable state".to_string(),
            });
        }

        if expression.contains("styleSheets") {
            *self.media_query_calls.lock().unwrap() += 1;
            let mut remaining = self.remaining_media_failures.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(VetrinaError::TransientFetch(
                    "render session crashed".to_string(),
                ));
            }
            return Ok(serde_json::Value::Bool(self.media_query));
        }

        if expression.contains("getBoundingClientRect") {
            return Ok(serde_json::Value::Bool(self.no_overflow));
        }

        if expression.contains("scrollWidth") {
            let mut calls = self.scroll_calls.lock().unwrap();
            let pass = *calls < self.scroll_free_viewports;
            *calls += 1;
            return Ok(serde_json::Value::Bool(pass));
        }

        Ok(serde_json::Value::Null)
    }
}

// --- Directory ---

/// Scripted paginated directory: one candidate list per page, exhausted
/// when the script runs out.
pub struct ScriptedDirectory {
    pages: Vec<Vec<Candidate>>,
}

impl ScriptedDirectory {
    pub fn new(pages: Vec<Vec<Candidate>>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl DirectorySource for ScriptedDirectory {
    async fn page(&self, page: u32) -> Result<Option<Vec<Candidate>>, VetrinaError> {
        Ok(self.pages.get(page as usize - 1).cloned())
    }
}
