use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Lifecycle ---

/// Where a business record sits in the pipeline lifecycle.
///
/// `lifecycle_rank()` defines the merge ordering the ledger enforces:
/// a record never moves backwards across runs (a stale `NoSite` can't
/// clobber a `Scored` entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    /// Raw candidate from the directory, not yet classified.
    Discovered,
    /// Directory listing carried a usable website URL.
    HasSite,
    /// No usable website URL (none extracted, or denylisted host).
    NoSite,
    /// Fallback search in progress.
    ResolvingSite,
    /// Fallback search recovered a site that passed both plausibility checks.
    SiteVerified,
    /// Fallback search exhausted without a verified site.
    SiteUnverified,
    /// Quality evaluation produced a percentage.
    Scored,
    /// Top-level navigation to the site never succeeded.
    ScoreFailed,
}

impl BusinessStatus {
    /// Ordering used by `Ledger::merge`. Higher rank wins on conflict;
    /// equal rank lets the incoming record refresh the stored one.
    ///
    /// `ScoreFailed` sits level with `HasSite`: the evaluator's failure
    /// outcome replaces the record it scored, and a later run that finds
    /// the site listed again refreshes it back to `HasSite` for another
    /// scoring attempt. A failed navigation is never a dead end.
    pub fn lifecycle_rank(&self) -> u8 {
        match self {
            BusinessStatus::Discovered => 0,
            BusinessStatus::NoSite => 1,
            BusinessStatus::ResolvingSite => 2,
            BusinessStatus::SiteUnverified => 2,
            BusinessStatus::HasSite => 3,
            BusinessStatus::ScoreFailed => 3,
            BusinessStatus::SiteVerified => 4,
            BusinessStatus::Scored => 5,
        }
    }

    /// Statuses whose records carry a `site` URL.
    pub fn carries_site(&self) -> bool {
        matches!(
            self,
            BusinessStatus::HasSite | BusinessStatus::SiteVerified | BusinessStatus::Scored
        )
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessStatus::Discovered => write!(f, "discovered"),
            BusinessStatus::HasSite => write!(f, "has_site"),
            BusinessStatus::NoSite => write!(f, "no_site"),
            BusinessStatus::ResolvingSite => write!(f, "resolving_site"),
            BusinessStatus::SiteVerified => write!(f, "site_verified"),
            BusinessStatus::SiteUnverified => write!(f, "site_unverified"),
            BusinessStatus::Scored => write!(f, "scored"),
            BusinessStatus::ScoreFailed => write!(f, "score_failed"),
        }
    }
}

/// Pipeline stage that last wrote a record. Audit field only — merge
/// decisions come from `BusinessStatus::lifecycle_rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Classification,
    Resolution,
    Scoring,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Classification => write!(f, "classification"),
            Stage::Resolution => write!(f, "resolution"),
            Stage::Scoring => write!(f, "scoring"),
        }
    }
}

// --- Business Record ---

/// One business in the registry, keyed by `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    /// Business-owned website, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub status: BusinessStatus,
    /// Quality percentage, present iff `status == Scored`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub source_stage: Stage,
    pub updated_at: DateTime<Utc>,
}

impl BusinessRecord {
    pub fn has_site(name: &str, site: &str) -> Self {
        Self {
            name: name.to_string(),
            site: Some(site.to_string()),
            status: BusinessStatus::HasSite,
            score: None,
            source_stage: Stage::Classification,
            updated_at: Utc::now(),
        }
    }

    pub fn no_site(name: &str) -> Self {
        Self {
            name: name.to_string(),
            site: None,
            status: BusinessStatus::NoSite,
            score: None,
            source_stage: Stage::Classification,
            updated_at: Utc::now(),
        }
    }

    /// Resolver outcome: verified site recovered via search.
    pub fn verified(mut self, site: &str) -> Self {
        self.site = Some(site.to_string());
        self.status = BusinessStatus::SiteVerified;
        self.source_stage = Stage::Resolution;
        self.updated_at = Utc::now();
        self
    }

    /// Resolver outcome: no plausible site found. The business keeps no site.
    pub fn unverified(mut self) -> Self {
        self.site = None;
        self.status = BusinessStatus::SiteUnverified;
        self.source_stage = Stage::Resolution;
        self.updated_at = Utc::now();
        self
    }

    /// Evaluator outcome: scored percentage.
    pub fn scored(mut self, score: u8) -> Self {
        self.score = Some(score.min(100));
        self.status = BusinessStatus::Scored;
        self.source_stage = Stage::Scoring;
        self.updated_at = Utc::now();
        self
    }

    /// Evaluator outcome: top-level navigation never succeeded. Distinct
    /// from a site that legitimately fails every check (which scores ~0).
    /// The site URL is dropped so the record reports as "N/A" and a later
    /// run can re-resolve it.
    pub fn score_failed(mut self) -> Self {
        self.site = None;
        self.score = None;
        self.status = BusinessStatus::ScoreFailed;
        self.source_stage = Stage::Scoring;
        self.updated_at = Utc::now();
        self
    }
}

// --- URL helpers ---

/// Lowercased host portion of a URL, without scheme, path, or port.
pub fn extract_host(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let host = without_scheme.split('/').next().unwrap_or("");
    host.split(':').next().unwrap_or("").to_lowercase()
}

/// Normalize a business name for domain matching: lowercase, drop
/// whitespace and common punctuation.
pub fn normalize_business_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '.' | ',' | '-' | '\'' | '&'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_rank_orders_statuses() {
        assert!(
            BusinessStatus::NoSite.lifecycle_rank() < BusinessStatus::HasSite.lifecycle_rank()
        );
        assert!(
            BusinessStatus::HasSite.lifecycle_rank()
                < BusinessStatus::SiteVerified.lifecycle_rank()
        );
        assert!(
            BusinessStatus::SiteVerified.lifecycle_rank()
                < BusinessStatus::Scored.lifecycle_rank()
        );
    }

    #[test]
    fn score_failed_and_has_site_refresh_each_other() {
        // Equal rank: the failure outcome replaces the record it scored,
        // and a fresh listing next run replaces the failure.
        assert_eq!(
            BusinessStatus::ScoreFailed.lifecycle_rank(),
            BusinessStatus::HasSite.lifecycle_rank()
        );
        assert!(
            BusinessStatus::ScoreFailed.lifecycle_rank()
                < BusinessStatus::Scored.lifecycle_rank()
        );
    }

    #[test]
    fn site_presence_matches_status() {
        let with_site = BusinessRecord::has_site("Acme Srl", "https://acme.it");
        assert!(with_site.status.carries_site());
        assert!(with_site.site.is_some());

        let without = BusinessRecord::no_site("Acme Srl");
        assert!(!without.status.carries_site());
        assert!(without.site.is_none());

        let unverified = without.unverified();
        assert!(unverified.site.is_none());
        assert_eq!(unverified.status, BusinessStatus::SiteUnverified);
    }

    #[test]
    fn scored_clamps_to_100() {
        let r = BusinessRecord::has_site("Acme Srl", "https://acme.it").scored(250);
        assert_eq!(r.score, Some(100));
        assert_eq!(r.status, BusinessStatus::Scored);
    }

    #[test]
    fn extract_host_strips_scheme_path_and_port() {
        assert_eq!(extract_host("https://www.acme.it/chi-siamo"), "www.acme.it");
        assert_eq!(extract_host("http://acme.it:8080/"), "acme.it");
        assert_eq!(extract_host("acme.it/contatti"), "acme.it");
    }

    #[test]
    fn normalize_drops_spaces_and_punctuation() {
        assert_eq!(normalize_business_name("Trattoria Rossi"), "trattoriarossi");
        assert_eq!(normalize_business_name("F.lli Bianchi & C."), "fllibianchic");
    }
}
