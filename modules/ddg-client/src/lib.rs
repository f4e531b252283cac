pub mod error;
pub mod types;

pub use error::{DdgError, Result};
pub use types::SearchHit;

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::info;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// The HTML endpoint rejects requests without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0";

/// Client for DuckDuckGo's JS-free HTML endpoint. No API key; results are
/// parsed straight out of the result-list markup.
pub struct DdgClient {
    client: reqwest::Client,
}

impl DdgClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Run a search and return up to `limit` organic hits, in rank order.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        info!(query, limit, "DuckDuckGo search");

        let resp = self
            .client
            .post(SEARCH_URL)
            .form(&[("q", query)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DdgError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let hits = parse_results(&body, limit);
        info!(query, count = hits.len(), "DuckDuckGo search complete");
        Ok(hits)
    }
}

impl Default for DdgClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `a.result__a` anchors from a results page. Redirect-wrapped
/// links (`/l/?uddg=<encoded>`) are unwrapped to the destination URL.
fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let anchor = Selector::parse("a.result__a").expect("valid selector");

    let mut hits = Vec::new();
    for element in document.select(&anchor) {
        let href = match element.value().attr("href") {
            Some(h) if !h.is_empty() => h,
            _ => continue,
        };
        let title = element.text().collect::<String>().trim().to_string();

        if let Some(url) = unwrap_redirect(href) {
            hits.push(SearchHit { title, url });
            if hits.len() >= limit {
                break;
            }
        }
    }
    hits
}

/// DDG wraps destinations in `//duckduckgo.com/l/?uddg=<url-encoded>`.
/// Direct http(s) hrefs pass through unchanged.
fn unwrap_redirect(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        return None;
    };

    let parsed = url::Url::parse(&absolute).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "uddg")
        .map(|(_, v)| v.into_owned())
}
