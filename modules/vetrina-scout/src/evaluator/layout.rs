//! Render-side signal probes: layout facts only a live page can answer.
//! Each probe is a JS expression evaluated through the renderer's escape
//! hatch. A failed evaluation counts as "signal not observed" at the call
//! site — except media-query detection, which surfaces transient errors so
//! the evaluator can retry it.

use tracing::warn;
use vetrina_common::{VetrinaError, PROBE_VIEWPORTS, VIEWPORT_MIN_PASSES};

use crate::traits::PageRenderer;

/// No element's bounding box extends past the right edge of the viewport.
const NO_OVERFLOW_EXPR: &str = "\
!Array.from(document.querySelectorAll('*')).some(el => {
    const rect = el.getBoundingClientRect();
    return rect.right > window.innerWidth;
})";

/// At least one CSS rule behind a media query, across all stylesheets.
/// Cross-origin sheets throw on cssRules access and are skipped.
const HAS_MEDIA_QUERY_EXPR: &str = "\
Array.from(document.styleSheets).some(sheet => {
    try {
        return Array.from(sheet.cssRules || []).some(rule => rule.media && rule.media.mediaText);
    } catch (e) {
        return false;
    }
})";

/// Body fits the viewport without a horizontal scrollbar.
const NO_HSCROLL_EXPR: &str = "document.body.scrollWidth <= window.innerWidth";

fn as_bool(value: serde_json::Value) -> bool {
    value.as_bool().unwrap_or(false)
}

/// True when no element overflows horizontally at the default width.
/// Evaluation failure counts as "overflow present".
pub async fn no_horizontal_overflow(renderer: &dyn PageRenderer, url: &str) -> bool {
    match renderer.evaluate(url, NO_OVERFLOW_EXPR, None).await {
        Ok(v) => as_bool(v),
        Err(e) => {
            warn!(url, error = %e, "Overflow probe failed, counting as not passed");
            false
        }
    }
}

/// Media-query detection needs a full render: stylesheets injected by
/// scripts are invisible to a static fetch. Transient failures propagate
/// so the caller can wrap this probe in a bounded retry.
pub async fn media_query_present(
    renderer: &dyn PageRenderer,
    url: &str,
) -> Result<bool, VetrinaError> {
    renderer
        .evaluate(url, HAS_MEDIA_QUERY_EXPR, None)
        .await
        .map(as_bool)
}

/// How many of the probe viewports render without horizontal scroll.
pub async fn scroll_free_viewport_count(renderer: &dyn PageRenderer, url: &str) -> usize {
    let mut passed = 0;
    for &(width, height) in PROBE_VIEWPORTS.iter() {
        match renderer
            .evaluate(url, NO_HSCROLL_EXPR, Some((width, height)))
            .await
        {
            Ok(v) => {
                if as_bool(v) {
                    passed += 1;
                }
            }
            Err(e) => {
                warn!(url, width, height, error = %e, "Viewport probe failed, counting as not passed");
            }
        }
    }
    passed
}

/// The viewport sub-signal passes when enough widths are scroll-free.
pub fn viewports_signal(passed: usize) -> bool {
    passed >= VIEWPORT_MIN_PASSES
}
