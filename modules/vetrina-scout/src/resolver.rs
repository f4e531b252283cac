//! Fallback Resolver: tries to recover a verified website for businesses
//! the directory listed without one.
//!
//! Two-part authenticity heuristic. Domain plausibility alone accepts any
//! page that ranks for the company name; content plausibility alone
//! accepts unrelated pages carrying a registration marker. The conjunction
//! keeps both failure modes rare while staying cheap: one search query and
//! at most K page fetches per candidate.

use std::time::Duration;

use scraper::Html;
use tracing::{info, warn};
use vetrina_common::{
    extract_host, host_matches, normalize_business_name, BusinessRecord, VetrinaError,
    NON_BUSINESS_HOSTS, SEARCH_REJECT_HOSTS,
};

use crate::traits::{PageFetcher, WebSearcher};

/// Leading characters of the normalized name that must appear in the host.
const DOMAIN_PREFIX_LEN: usize = 6;

/// Budget for each content-plausibility fetch.
const CONTENT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Italian business-registration markers accepted as content evidence.
const REGISTRATION_MARKERS: &[&str] = &["partita iva", "p.iva"];

pub struct FallbackResolver<'a> {
    searcher: &'a dyn WebSearcher,
    fetcher: &'a dyn PageFetcher,
    top_k: usize,
}

impl<'a> FallbackResolver<'a> {
    pub fn new(searcher: &'a dyn WebSearcher, fetcher: &'a dyn PageFetcher, top_k: usize) -> Self {
        Self {
            searcher,
            fetcher,
            top_k,
        }
    }

    /// Attempt to recover a verified site for a no-site record.
    ///
    /// Search-hit evaluation is sequential and first-match-wins; a fetch
    /// failure counts as a failed check for that hit, never as a pipeline
    /// error. Search provider errors degrade to zero hits.
    pub async fn resolve(&self, record: BusinessRecord) -> BusinessRecord {
        let name = record.name.clone();

        let hits = match self.searcher.search(&name, self.top_k).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(name = %name, error = %e, "Search provider failed, treating as zero hits");
                Vec::new()
            }
        };

        for hit in hits.iter().take(self.top_k) {
            if !domain_plausible(&name, &hit.url) {
                continue;
            }

            match self.content_plausible(&name, &hit.url).await {
                Ok(true) => {
                    info!(name = %name, site = %hit.url, "Fallback search verified a site");
                    return record.verified(&hit.url);
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(name = %name, url = %hit.url, error = %e, "Content check failed, trying next hit");
                }
            }
        }

        info!(name = %name, "No plausible site found");
        record.unverified()
    }

    async fn content_plausible(&self, name: &str, url: &str) -> Result<bool, VetrinaError> {
        let html = self.fetcher.fetch_text(url, CONTENT_FETCH_TIMEOUT).await?;
        Ok(content_matches(name, &html))
    }
}

/// Domain plausibility: the host must not be a known platform, and the
/// first characters of the normalized business name must appear in it.
pub fn domain_plausible(name: &str, url: &str) -> bool {
    let host = extract_host(url);
    if host.is_empty() {
        return false;
    }
    if host_matches(&host, NON_BUSINESS_HOSTS) || host_matches(&host, SEARCH_REJECT_HOSTS) {
        return false;
    }

    let normalized = normalize_business_name(name);
    if normalized.is_empty() {
        return false;
    }
    let prefix: String = normalized.chars().take(DOMAIN_PREFIX_LEN).collect();
    host.contains(&prefix)
}

/// Content plausibility: the visible page text carries a business
/// registration marker, or the first token of the business name.
pub fn content_matches(name: &str, html: &str) -> bool {
    let text = visible_text(html).to_lowercase();

    if REGISTRATION_MARKERS.iter().any(|m| text.contains(m)) {
        return true;
    }

    match name.to_lowercase().split_whitespace().next() {
        Some(first_token) => text.contains(first_token),
        None => false,
    }
}

/// Visible text of a document, markup stripped.
fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document.root_element().text().collect::<Vec<_>>().join(" ")
}
