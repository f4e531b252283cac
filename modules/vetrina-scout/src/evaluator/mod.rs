//! Quality Evaluator: composes signal probes into graded sub-checklists
//! and a weighted percentage.
//!
//! Two tiers: responsiveness and SEO are gates over several probes each;
//! everything else maps one probe to one weight. Weights come from the
//! `ScoreRubric` config so tuning never touches this control flow.

pub mod layout;
pub mod probes;

use std::time::Duration;

use tracing::{info, warn};
use vetrina_common::{
    BusinessRecord, ScoreRubric, VetrinaError, LOAD_BUDGET, RESPONSIVE_MIN_SIGNALS,
    SEO_MIN_SIGNALS,
};

use crate::retry::retry_with_delay;
use crate::traits::PageRenderer;
use probes::StaticProbeReport;

/// Attempts for the render-dependent media-query probe.
const MEDIA_QUERY_ATTEMPTS: u32 = 3;
const MEDIA_QUERY_RETRY_DELAY: Duration = Duration::from_millis(750);

/// Outcome of one sub-check: identity, pass/fail, and weight toward the
/// final percentage. Ephemeral — only the aggregate score is persisted.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub id: &'static str,
    pub passed: bool,
    pub weight: u8,
}

/// A gate passes when at least `min` of its signals do. A hard count
/// cutoff, not weighted internally: passing strictly more signals never
/// flips a passing gate to failing.
pub fn count_gate(signals: &[bool], min: usize) -> bool {
    signals.iter().filter(|&&s| s).count() >= min
}

/// Final score: exact sum of weights for passed sub-checks, clamped to
/// [0, 100]. Deterministic for identical probe outcomes.
pub fn score_from(results: &[ProbeResult]) -> u8 {
    results
        .iter()
        .filter(|r| r.passed)
        .map(|r| r.weight as u32)
        .sum::<u32>()
        .min(100) as u8
}

pub struct QualityEvaluator<'a> {
    renderer: &'a dyn PageRenderer,
    rubric: ScoreRubric,
}

impl<'a> QualityEvaluator<'a> {
    pub fn new(renderer: &'a dyn PageRenderer, rubric: ScoreRubric) -> Self {
        Self { renderer, rubric }
    }

    /// Score a record that carries a site. Returns the record advanced to
    /// `Scored`, or `ScoreFailed` when top-level navigation never succeeds.
    /// Individual probe failures count as "not passed" and never abort.
    pub async fn evaluate(&self, record: BusinessRecord) -> BusinessRecord {
        let Some(site) = record.site.clone() else {
            warn!(name = %record.name, "Evaluator got a record without a site, skipping");
            return record;
        };

        let rendered = match self.renderer.render(&site).await {
            Ok(page) => page,
            Err(e) => {
                warn!(name = %record.name, site, error = %e, "Top-level navigation failed");
                return record.score_failed();
            }
        };

        let results = self.run_checks(&site, &rendered.html, rendered.load_time).await;
        let score = score_from(&results);

        info!(
            name = %record.name,
            site,
            score,
            passed = results.iter().filter(|r| r.passed).count(),
            total = results.len(),
            "Site evaluated"
        );
        record.scored(score)
    }

    async fn run_checks(
        &self,
        site: &str,
        html: &str,
        load_time: Duration,
    ) -> Vec<ProbeResult> {
        let report = StaticProbeReport::from_html(html);

        let responsive = self.responsiveness_gate(site, &report).await;
        let seo_passed = count_gate(&report.seo_signals(), SEO_MIN_SIGNALS);

        let r = &self.rubric;
        vec![
            ProbeResult { id: "responsiveness", passed: responsive, weight: r.responsiveness },
            ProbeResult { id: "header", passed: report.header, weight: r.header },
            ProbeResult { id: "footer", passed: report.footer, weight: r.footer },
            ProbeResult { id: "logo", passed: report.logo, weight: r.logo },
            ProbeResult { id: "contact_info", passed: report.contact_info, weight: r.contact_info },
            ProbeResult { id: "seo", passed: seo_passed, weight: r.seo },
            ProbeResult {
                id: "load_performance",
                passed: load_time <= LOAD_BUDGET,
                weight: r.load_performance,
            },
            ProbeResult {
                id: "tls",
                passed: site.starts_with("https://"),
                weight: r.tls,
            },
            ProbeResult { id: "map_embed", passed: report.map_embed, weight: r.map_embed },
            ProbeResult { id: "social_links", passed: report.social_links, weight: r.social_links },
            ProbeResult {
                id: "privacy_policy",
                passed: report.privacy_policy,
                weight: r.privacy_policy,
            },
        ]
    }

    /// Responsiveness gate: 5 signals, pass at `RESPONSIVE_MIN_SIGNALS`.
    /// The gate is a hard count cutoff — passing more signals can only
    /// help, never hurt.
    async fn responsiveness_gate(&self, site: &str, report: &StaticProbeReport) -> bool {
        let media_query = retry_with_delay(
            MEDIA_QUERY_ATTEMPTS,
            MEDIA_QUERY_RETRY_DELAY,
            || layout::media_query_present(self.renderer, site),
            |e| matches!(e, VetrinaError::TransientFetch(_)),
        )
        .await
        .unwrap_or_else(|e| {
            warn!(site, error = %e, "Media-query probe exhausted retries, counting as not passed");
            false
        });

        let no_overflow = layout::no_horizontal_overflow(self.renderer, site).await;
        let scroll_free = layout::scroll_free_viewport_count(self.renderer, site).await;

        let signals = [
            report.viewport_meta,
            no_overflow,
            media_query,
            layout::viewports_signal(scroll_free),
            report.framework_marker,
        ];
        count_gate(&signals, RESPONSIVE_MIN_SIGNALS)
    }
}
