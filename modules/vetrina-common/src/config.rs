use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
/// Run-shaped parameters (region, page count) come from the CLI instead.
#[derive(Debug, Clone)]
pub struct Config {
    /// Browserless-compatible rendering service.
    pub browserless_url: String,
    pub browserless_token: Option<String>,

    /// Durable registry location.
    pub ledger_path: String,

    /// Directory listing to walk (region appended per page).
    pub directory_base_url: String,

    /// Concurrent render sessions. Each session is a scarce resource on
    /// the rendering service, so keep this small.
    pub max_render_sessions: usize,

    /// Search hits considered per no-site candidate.
    pub search_top_k: usize,

    /// Politeness delay between fallback-search candidates.
    pub resolver_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            browserless_url: required_env("BROWSERLESS_URL"),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            ledger_path: env::var("LEDGER_PATH")
                .unwrap_or_else(|_| "vetrina_ledger.json".to_string()),
            directory_base_url: env::var("DIRECTORY_BASE_URL")
                .unwrap_or_else(|_| "https://www.paginegialle.it/ricerca/aziende".to_string()),
            max_render_sessions: parse_env("MAX_RENDER_SESSIONS", 2),
            search_top_k: parse_env("SEARCH_TOP_K", 3),
            resolver_delay: Duration::from_secs(parse_env("RESOLVER_DELAY_SECS", 2)),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
