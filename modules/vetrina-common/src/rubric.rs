use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Weights for the two-tier quality checklist. Held as configuration so
/// rubric tuning never touches the evaluator's control flow.
///
/// The defaults sum to 100; `score_from` clamps anyway so a tuned rubric
/// that sums differently still yields a bounded percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRubric {
    pub responsiveness: u8,
    pub header: u8,
    pub footer: u8,
    pub logo: u8,
    pub contact_info: u8,
    pub seo: u8,
    pub load_performance: u8,
    pub tls: u8,
    pub map_embed: u8,
    pub social_links: u8,
    pub privacy_policy: u8,
}

impl Default for ScoreRubric {
    fn default() -> Self {
        Self {
            responsiveness: 20,
            header: 5,
            footer: 5,
            logo: 5,
            contact_info: 5,
            seo: 25,
            load_performance: 10,
            tls: 10,
            map_embed: 5,
            social_links: 5,
            privacy_policy: 5,
        }
    }
}

impl ScoreRubric {
    pub fn total(&self) -> u32 {
        [
            self.responsiveness,
            self.header,
            self.footer,
            self.logo,
            self.contact_info,
            self.seo,
            self.load_performance,
            self.tls,
            self.map_embed,
            self.social_links,
            self.privacy_policy,
        ]
        .iter()
        .map(|&w| w as u32)
        .sum()
    }
}

/// Responsiveness gate: how many of the 5 signals must pass.
pub const RESPONSIVE_MIN_SIGNALS: usize = 3;

/// SEO gate: how many of the 4 signals must pass.
pub const SEO_MIN_SIGNALS: usize = 3;

/// Full page load must complete within this budget to earn the
/// load-performance weight.
pub const LOAD_BUDGET: Duration = Duration::from_millis(3000);

/// Title tag length bounds (inclusive) for the SEO title signal.
pub const TITLE_LEN_RANGE: (usize, usize) = (10, 70);

/// Meta description length bounds (inclusive).
pub const META_DESC_LEN_RANGE: (usize, usize) = (50, 160);

/// Fraction of images that must carry non-empty alt text. Vacuously
/// satisfied when the page has no images.
pub const ALT_TEXT_MIN_RATIO: f64 = 0.9;

/// Viewport widths probed for horizontal scroll; the gate needs at least
/// `VIEWPORT_MIN_PASSES` of them scroll-free.
pub const PROBE_VIEWPORTS: [(u32, u32); 3] = [(1920, 1080), (1024, 768), (375, 667)];
pub const VIEWPORT_MIN_PASSES: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rubric_sums_to_100() {
        assert_eq!(ScoreRubric::default().total(), 100);
    }
}
