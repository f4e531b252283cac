use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserlessError>;

#[derive(Debug, Error)]
pub enum BrowserlessError {
    #[error("Network error: {0}")]
    Network(String),

    /// Navigation or render exceeded its deadline. Kept separate from
    /// `Network` so callers can treat timeouts as transient.
    #[error("Render timed out after {0}ms")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Evaluation returned non-JSON payload: {0}")]
    BadPayload(String),
}

impl BrowserlessError {
    /// Transport-level failures worth retrying (render-engine crash,
    /// navigation timeout). API rejections below 500 are not transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BrowserlessError::Network(_) | BrowserlessError::Timeout(_)
        ) || matches!(self, BrowserlessError::Api { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for BrowserlessError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BrowserlessError::Timeout(0)
        } else {
            BrowserlessError::Network(err.to_string())
        }
    }
}
