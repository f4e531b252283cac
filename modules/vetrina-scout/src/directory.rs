//! Directory Source Adapter: walks a Pagine Gialle-style listing and
//! yields raw (name, maybe-site) pairs. Thin I/O wrapper — everything
//! interesting happens downstream of classification.

use scraper::{Html, Selector};
use tracing::{info, warn};
use vetrina_common::VetrinaError;

use crate::traits::{Candidate, DirectorySource, PageRenderer};

const LISTING_ITEM: &str = "div.search-itm.js-shiny-data-user div.search-itm__info a[href]";
const COMPANY_TITLE: &str = "span.scheda-azienda__companyTitle_content";
const COMPANY_TITLE_FALLBACK: &str = "h1.scheda-azienda__companyTitle";
const WEBSITE_BUTTON: &str = r#"a.bttn.bttn--white[title^="sito web"]"#;

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub struct PagineGialleSource<'a> {
    renderer: &'a dyn PageRenderer,
    base_url: String,
    region: String,
}

impl<'a> PagineGialleSource<'a> {
    pub fn new(renderer: &'a dyn PageRenderer, base_url: &str, region: &str) -> Self {
        Self {
            renderer,
            base_url: base_url.trim_end_matches('/').to_string(),
            region: region.to_string(),
        }
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/{}/p-{page}", self.base_url, self.region)
    }
}

#[async_trait::async_trait]
impl DirectorySource for PagineGialleSource<'_> {
    async fn page(&self, page: u32) -> Result<Option<Vec<Candidate>>, VetrinaError> {
        let url = self.page_url(page);
        info!(page, url, "Visiting directory page");

        let rendered = self.renderer.render(&url).await?;
        let detail_urls = listing_links(&rendered.html);
        if detail_urls.is_empty() {
            info!(page, "No listings found, pagination exhausted");
            return Ok(None);
        }
        info!(page, count = detail_urls.len(), "Found listings");

        let mut candidates = Vec::new();
        for detail_url in detail_urls {
            // One bad detail page never ends the walk.
            match self.renderer.render(&detail_url).await {
                Ok(detail) => {
                    if let Some(candidate) = parse_detail(&detail.html) {
                        candidates.push(candidate);
                    } else {
                        warn!(url = %detail_url, "Detail page without a company title, skipping");
                    }
                }
                Err(e) => {
                    warn!(url = %detail_url, error = %e, "Failed to open detail page, skipping");
                }
            }
        }

        Ok(Some(candidates))
    }
}

/// Detail-page links out of a listing page.
fn listing_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&sel(LISTING_ITEM))
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(String::from)
        .collect()
}

/// Company name and website slot from a detail page.
fn parse_detail(html: &str) -> Option<Candidate> {
    let document = Html::parse_document(html);

    let name = document
        .select(&sel(COMPANY_TITLE))
        .next()
        .or_else(|| document.select(&sel(COMPANY_TITLE_FALLBACK)).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|n| !n.is_empty())?;

    let raw_site = document
        .select(&sel(WEBSITE_BUTTON))
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(String::from);

    Some(Candidate { name, raw_site })
}
