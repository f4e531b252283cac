//! Stage orchestration: classification → resolution → scoring, with the
//! ledger as the single source of truth between stages.
//!
//! Stages hand the ledger off in-process; persistence at the end of each
//! stage exists for crash recovery, not as the communication channel. No
//! error from one candidate terminates processing of the others — only a
//! ledger write failure aborts, since it risks losing progress silently.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;
use vetrina_common::{BusinessRecord, BusinessStatus, ScoreRubric, Stage, VetrinaError};

use crate::classifier::classify;
use crate::evaluator::QualityEvaluator;
use crate::ledger::Ledger;
use crate::resolver::FallbackResolver;
use crate::traits::{DirectorySource, PageFetcher, PageRenderer, WebSearcher};

pub struct Pipeline {
    ledger: Arc<Ledger>,
    run_id: Uuid,
}

impl Pipeline {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Walk the directory and classify every candidate into
    /// HasSite / NoSite. Stops at `max_pages` or when pagination ends.
    pub async fn run_classification(
        &self,
        source: &dyn DirectorySource,
        max_pages: u32,
    ) -> Result<(), VetrinaError> {
        info!(run_id = %self.run_id, stage = %Stage::Classification, max_pages, "Stage starting");
        let mut classified = 0usize;

        for page in 1..=max_pages {
            let candidates = match source.page(page).await {
                Ok(Some(candidates)) => candidates,
                Ok(None) => {
                    info!(page, "Directory exhausted");
                    break;
                }
                Err(e) => {
                    warn!(page, error = %e, "Directory page failed, continuing with next");
                    continue;
                }
            };

            for candidate in &candidates {
                self.ledger.merge(classify(candidate));
                classified += 1;
            }
        }

        info!(run_id = %self.run_id, classified, "Classification complete");
        self.ledger.save()
    }

    /// Try to recover a verified site for every record that lacks one:
    /// fresh NoSite entries plus previously unverified or score-failed
    /// businesses, re-queried each run. Candidates run sequentially with a
    /// politeness delay between search queries.
    pub async fn run_resolution(
        &self,
        searcher: &dyn WebSearcher,
        fetcher: &dyn PageFetcher,
        top_k: usize,
        delay: Duration,
    ) -> Result<(), VetrinaError> {
        let pending = self.ledger.pending_resolution();
        info!(run_id = %self.run_id, stage = %Stage::Resolution, pending = pending.len(), "Stage starting");

        let resolver = FallbackResolver::new(searcher, fetcher, top_k);
        let total = pending.len();

        for (i, record) in pending.into_iter().enumerate() {
            // Mark in-flight and persist, so a crash mid-stage is visible
            // in the ledger on disk.
            let mut resolving = record.clone();
            resolving.status = BusinessStatus::ResolvingSite;
            self.ledger.merge(resolving);
            self.ledger.save()?;

            let resolved = resolver.resolve(record).await;
            self.ledger.merge(resolved);

            if i + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }

        let verified = self.ledger.with_status(BusinessStatus::SiteVerified).len();
        info!(run_id = %self.run_id, verified, "Resolution complete");
        self.ledger.save()
    }

    /// Score every record that carries a site. Fan-out is bounded both
    /// here and by the renderer's session pool.
    pub async fn run_scoring(
        &self,
        renderer: &dyn PageRenderer,
        rubric: ScoreRubric,
        max_concurrent: usize,
    ) -> Result<(), VetrinaError> {
        let pending = self.ledger.pending_scoring();
        info!(run_id = %self.run_id, stage = %Stage::Scoring, pending = pending.len(), "Stage starting");

        let evaluator = QualityEvaluator::new(renderer, rubric);

        let scored: Vec<BusinessRecord> = stream::iter(pending)
            .map(|record| evaluator.evaluate(record))
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

        for record in scored {
            self.ledger.merge(record);
        }

        let done = self.ledger.with_status(BusinessStatus::Scored).len();
        let failed = self.ledger.with_status(BusinessStatus::ScoreFailed).len();
        info!(run_id = %self.run_id, scored = done, failed, "Scoring complete");
        self.ledger.save()
    }
}
