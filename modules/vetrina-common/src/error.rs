use thiserror::Error;

/// Failure taxonomy for the pipeline. Per-candidate failures never abort a
/// batch — stage orchestration logs them and continues. Only `Ledger`
/// (persistence I/O) is fatal to a run, since silently losing progress is
/// worse than stopping.
#[derive(Error, Debug)]
pub enum VetrinaError {
    /// Timeout or connection reset. Retried only for the render-dependent
    /// media-query probe; elsewhere treated as "probe not passed".
    #[error("Transient fetch error: {0}")]
    TransientFetch(String),

    /// Page never reached a usable state. Short-circuits the candidate to
    /// ScoreFailed / SiteUnverified.
    #[error("Navigation error for {url}: {message}")]
    Navigation { url: String, message: String },

    /// Search capability failed. Treated as zero hits for the candidate.
    #[error("Search provider error: {0}")]
    SearchProvider(String),

    #[error("Ledger persistence error: {0}")]
    Ledger(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
