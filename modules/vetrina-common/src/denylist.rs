//! Host denylists shared by the classifier, the fallback resolver, and the
//! social-links probe. Membership is case-insensitive substring match
//! against the host, because directory listings and search results carry
//! regional subdomains (`it-it.facebook.com`, `m.facebook.com`, …).

/// Platforms that show up in a directory's "website" slot but are not
/// business-owned domains. A listing URL on one of these is downgraded
/// to "no site" so quality scoring never runs against a social profile.
pub const NON_BUSINESS_HOSTS: &[&str] = &[
    "facebook",
    "instagram",
    "linkedin",
    "twitter",
    "x.com",
    "tiktok",
    "pinterest",
    "wixsite",
    "linktr.ee",
    "sites.google",
];

/// Additional hosts rejected during fallback search: video and hosted-blog
/// platforms that rank well for company names but are never the company's
/// own site.
pub const SEARCH_REJECT_HOSTS: &[&str] = &["youtube", "vimeo", "blogspot", "wordpress.com"];

/// Social networks counted by the "social links present" probe.
pub const SOCIAL_LINK_HOSTS: &[&str] = &[
    "facebook",
    "instagram",
    "linkedin",
    "twitter",
    "x.com",
    "tiktok",
    "youtube",
    "pinterest",
];

/// URL fragments identifying embedded maps.
pub const MAP_PROVIDER_PATTERNS: &[&str] = &[
    "google.com/maps",
    "goo.gl/maps",
    "maps.googleapis.com",
    "openstreetmap.org",
    "bing.com/maps",
];

/// Markup markers for known responsive CSS frameworks.
pub const RESPONSIVE_FRAMEWORK_MARKERS: &[&str] = &["bootstrap", "tailwind", "foundation"];

/// Case-insensitive match of `host` against a denylist. Bare names
/// ("facebook") match as substrings so regional subdomains are caught;
/// dotted entries ("x.com", "linktr.ee") must sit on label boundaries,
/// otherwise `fenix.com` would match `x.com`.
pub fn host_matches(host: &str, list: &[&str]) -> bool {
    let host = host.to_lowercase();
    list.iter().any(|entry| {
        if entry.contains('.') {
            label_bounded_match(&host, entry)
        } else {
            host.contains(entry)
        }
    })
}

/// `entry` occurs in `host` with a label boundary ('.' or string edge) on
/// both sides.
fn label_bounded_match(host: &str, entry: &str) -> bool {
    let bytes = host.as_bytes();
    let mut from = 0;
    while let Some(pos) = host[from..].find(entry) {
        let start = from + pos;
        let end = start + entry.len();
        let before_ok = start == 0 || bytes[start - 1] == b'.';
        let after_ok = end == host.len() || bytes[end] == b'.';
        if before_ok && after_ok {
            return true;
        }
        from = start + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_regional_subdomains() {
        assert!(host_matches("it-it.facebook.com", NON_BUSINESS_HOSTS));
        assert!(host_matches("m.FACEBOOK.com", NON_BUSINESS_HOSTS));
        assert!(host_matches("rossi.wixsite.com", NON_BUSINESS_HOSTS));
    }

    #[test]
    fn business_domains_pass() {
        assert!(!host_matches("trattoriarossi.it", NON_BUSINESS_HOSTS));
        assert!(!host_matches("acme-srl.com", SEARCH_REJECT_HOSTS));
    }

    #[test]
    fn search_rejects_video_and_blog_hosts() {
        assert!(host_matches("www.youtube.com", SEARCH_REJECT_HOSTS));
        assert!(host_matches("rossi.blogspot.com", SEARCH_REJECT_HOSTS));
    }

    #[test]
    fn dotted_entries_respect_label_boundaries() {
        assert!(host_matches("x.com", NON_BUSINESS_HOSTS));
        assert!(host_matches("www.x.com", NON_BUSINESS_HOSTS));
        assert!(host_matches("rossi.wordpress.com", SEARCH_REJECT_HOSTS));

        // Hosts merely ending in "x.com" are real business domains.
        assert!(!host_matches("fenix.com", NON_BUSINESS_HOSTS));
        assert!(!host_matches("xerox.com", NON_BUSINESS_HOSTS));
        assert!(!host_matches("www.fenix.com", NON_BUSINESS_HOSTS));
    }
}
