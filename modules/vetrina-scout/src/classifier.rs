//! Candidate Classifier: partitions fresh directory candidates into
//! "has site" / "no site".
//!
//! Directory listings frequently surface a social-media profile in the
//! "website" slot; scoring assumes a business-owned domain, so those URLs
//! are downgraded to "no site" and handed to the fallback resolver.

use tracing::debug;
use vetrina_common::{extract_host, host_matches, BusinessRecord, NON_BUSINESS_HOSTS};

use crate::traits::Candidate;

/// Classify one candidate. Pure — no fetches beyond what the directory
/// source already supplied.
pub fn classify(candidate: &Candidate) -> BusinessRecord {
    match candidate.raw_site.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            let host = extract_host(url.trim());
            if host_matches(&host, NON_BUSINESS_HOSTS) {
                debug!(name = %candidate.name, url, "Listing URL is a non-business platform, downgrading");
                BusinessRecord::no_site(&candidate.name)
            } else {
                BusinessRecord::has_site(&candidate.name, url.trim())
            }
        }
        _ => BusinessRecord::no_site(&candidate.name),
    }
}
