//! Static signal probes: pure functions of rendered markup. Everything
//! here is computed in one pass over the parsed document and returned as
//! a plain report, so the evaluator never holds a parsed DOM across an
//! await point.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use vetrina_common::{
    host_matches, ALT_TEXT_MIN_RATIO, MAP_PROVIDER_PATTERNS, META_DESC_LEN_RANGE,
    RESPONSIVE_FRAMEWORK_MARKERS, SOCIAL_LINK_HOSTS, TITLE_LEN_RANGE,
};

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Italian landline/mobile shapes: optional +39, then 8-11 digits with
    // optional separators.
    RE.get_or_init(|| {
        Regex::new(r"(\+39[\s.]?)?0?\d{2,4}[\s./-]?\d{5,8}\b").expect("valid regex")
    })
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
    })
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Outcomes of every markup-only probe for one page.
#[derive(Debug, Clone, Default)]
pub struct StaticProbeReport {
    pub viewport_meta: bool,
    pub framework_marker: bool,
    pub header: bool,
    pub footer: bool,
    pub logo: bool,
    pub contact_info: bool,
    pub title_len_ok: bool,
    pub meta_description_ok: bool,
    pub single_h1: bool,
    pub alt_text_ok: bool,
    pub map_embed: bool,
    pub social_links: bool,
    pub privacy_policy: bool,
}

impl StaticProbeReport {
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let lower = html.to_lowercase();
        let text = document
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ");
        let text_lower = text.to_lowercase();

        Self {
            viewport_meta: document.select(&sel(r#"meta[name="viewport"]"#)).next().is_some(),
            framework_marker: RESPONSIVE_FRAMEWORK_MARKERS.iter().any(|m| lower.contains(m)),
            header: has_any(&document, &["header", "#header", ".header", r#"[role="banner"]"#]),
            footer: has_any(&document, &["footer", "#footer", ".footer", r#"[role="contentinfo"]"#]),
            logo: has_any(
                &document,
                &[
                    r#"img[class*="logo"]"#,
                    r#"img[id*="logo"]"#,
                    r#"img[src*="logo"]"#,
                    r#"img[alt*="logo"]"#,
                    ".logo img",
                ],
            ),
            contact_info: phone_re().is_match(&text) && email_re().is_match(&text),
            title_len_ok: title_len_ok(&document),
            meta_description_ok: meta_description_ok(&document),
            single_h1: document.select(&sel("h1")).count() == 1,
            alt_text_ok: alt_text_ok(&document),
            map_embed: MAP_PROVIDER_PATTERNS.iter().any(|p| lower.contains(p)),
            social_links: social_links(&document),
            privacy_policy: text_lower.contains("privacy policy")
                || text_lower.contains("cookie policy"),
        }
    }

    /// SEO gate signals, in rubric order.
    pub fn seo_signals(&self) -> [bool; 4] {
        [
            self.title_len_ok,
            self.meta_description_ok,
            self.single_h1,
            self.alt_text_ok,
        ]
    }
}

fn has_any(document: &Html, selectors: &[&str]) -> bool {
    selectors
        .iter()
        .any(|css| document.select(&sel(css)).next().is_some())
}

fn title_len_ok(document: &Html) -> bool {
    let title = document
        .select(&sel("title"))
        .next()
        .map(|t| t.text().collect::<String>())
        .unwrap_or_default();
    let len = title.trim().chars().count();
    (TITLE_LEN_RANGE.0..=TITLE_LEN_RANGE.1).contains(&len)
}

fn meta_description_ok(document: &Html) -> bool {
    let desc = document
        .select(&sel(r#"meta[name="description"]"#))
        .next()
        .and_then(|m| m.value().attr("content"))
        .unwrap_or_default();
    let len = desc.trim().chars().count();
    (META_DESC_LEN_RANGE.0..=META_DESC_LEN_RANGE.1).contains(&len)
}

/// ≥90% of images carry non-empty alt text. Vacuously true with no images.
fn alt_text_ok(document: &Html) -> bool {
    let imgs: Vec<_> = document.select(&sel("img")).collect();
    if imgs.is_empty() {
        return true;
    }
    let with_alt = imgs
        .iter()
        .filter(|img| {
            img.value()
                .attr("alt")
                .is_some_and(|alt| !alt.trim().is_empty())
        })
        .count();
    with_alt as f64 / imgs.len() as f64 >= ALT_TEXT_MIN_RATIO
}

fn social_links(document: &Html) -> bool {
    document.select(&sel("a[href]")).any(|a| {
        let href = a.value().attr("href").unwrap_or_default();
        let host = vetrina_common::extract_host(href);
        !host.is_empty() && host_matches(&host, SOCIAL_LINK_HOSTS)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Trattoria Rossi — Cucina Toscana a Firenze</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="description" content="Trattoria Rossi: cucina toscana tradizionale nel centro di Firenze, dal 1962. Prenota il tuo tavolo.">
  <link rel="stylesheet" href="/css/bootstrap.min.css">
</head>
<body>
  <header><img src="/img/logo.png" alt="Trattoria Rossi"></header>
  <h1>Trattoria Rossi</h1>
  <img src="/img/sala.jpg" alt="La sala">
  <iframe src="https://www.google.com/maps/embed?pb=xyz"></iframe>
  <p>Tel. +39 055 1234567 — info@trattoriarossi.it</p>
  <a href="https://www.instagram.com/trattoriarossi">Instagram</a>
  <footer>P.IVA 01234567890 — <a href="/privacy">Privacy Policy</a></footer>
</body>
</html>"#;

    #[test]
    fn full_page_passes_every_static_probe() {
        let r = StaticProbeReport::from_html(FULL_PAGE);
        assert!(r.viewport_meta);
        assert!(r.framework_marker);
        assert!(r.header);
        assert!(r.footer);
        assert!(r.logo);
        assert!(r.contact_info);
        assert!(r.title_len_ok);
        assert!(r.meta_description_ok);
        assert!(r.single_h1);
        assert!(r.alt_text_ok);
        assert!(r.map_embed);
        assert!(r.social_links);
        assert!(r.privacy_policy);
    }

    #[test]
    fn bare_page_fails_almost_everything() {
        let r = StaticProbeReport::from_html("<html><body><p>ciao</p></body></html>");
        assert!(!r.viewport_meta);
        assert!(!r.header);
        assert!(!r.footer);
        assert!(!r.logo);
        assert!(!r.contact_info);
        assert!(!r.title_len_ok);
        assert!(!r.single_h1);
        assert!(!r.map_embed);
        assert!(!r.social_links);
        assert!(!r.privacy_policy);
        // No images at all — alt probe is vacuously true.
        assert!(r.alt_text_ok);
    }

    #[test]
    fn title_bounds_are_inclusive() {
        let short = "<head><title>Breve</title></head>";
        assert!(!StaticProbeReport::from_html(short).title_len_ok);

        let ten = format!("<head><title>{}</title></head>", "x".repeat(10));
        assert!(StaticProbeReport::from_html(&ten).title_len_ok);

        let too_long = format!("<head><title>{}</title></head>", "x".repeat(71));
        assert!(!StaticProbeReport::from_html(&too_long).title_len_ok);
    }

    #[test]
    fn multiple_h1_fails_seo_signal() {
        let html = "<body><h1>Uno</h1><h1>Due</h1></body>";
        assert!(!StaticProbeReport::from_html(html).single_h1);
    }

    #[test]
    fn alt_ratio_below_threshold_fails() {
        // 1 of 2 images with alt = 50% < 90%.
        let html = r#"<body><img src="a.jpg" alt="ok"><img src="b.jpg"></body>"#;
        assert!(!StaticProbeReport::from_html(html).alt_text_ok);

        // 10 images, 9 with alt = 90% passes.
        let mut page = String::from("<body>");
        for i in 0..9 {
            page.push_str(&format!(r#"<img src="{i}.jpg" alt="img {i}">"#));
        }
        page.push_str(r#"<img src="last.jpg"></body>"#);
        assert!(StaticProbeReport::from_html(&page).alt_text_ok);
    }

    #[test]
    fn contact_needs_both_phone_and_email() {
        let phone_only = "<body>Tel 055 1234567</body>";
        assert!(!StaticProbeReport::from_html(phone_only).contact_info);

        let email_only = "<body>info@acme.it</body>";
        assert!(!StaticProbeReport::from_html(email_only).contact_info);

        let both = "<body>Tel 055 1234567 — info@acme.it</body>";
        assert!(StaticProbeReport::from_html(both).contact_info);
    }

    #[test]
    fn relative_links_do_not_count_as_social() {
        let html = r#"<body><a href="/facebook-page-info">nota</a></body>"#;
        assert!(!StaticProbeReport::from_html(html).social_links);
    }
}
