//! Bounded retry with a fixed delay, for probes that depend on a rendering
//! session. Transient transport failures (render-engine crash, navigation
//! timeout) get another attempt; anything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

pub async fn retry_with_delay<T, E, F, Fut, P>(
    attempts: u32,
    delay: Duration,
    mut op: F,
    is_transient: P,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && is_transient(&e) => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Transient failure, retrying after delay"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
