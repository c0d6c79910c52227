use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Exponential backoff (base 1s, factor 2, max 3 attempts) around a
/// transient-error-prone capability call. Non-transient errors — anything
/// the backend returns that isn't a transport failure — should be handled
/// by the caller's own fallback, not retried here.
pub async fn with_backoff<F, Fut, T>(label: &str, mut attempt: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    const MAX_ATTEMPTS: u32 = 3;
    const BASE_DELAY: Duration = Duration::from_secs(1);

    let mut last_err = None;
    for n in 0..MAX_ATTEMPTS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt = n + 1, %label, error = %e, "backend call failed");
                last_err = Some(e);
                if n + 1 < MAX_ATTEMPTS {
                    let delay = BASE_DELAY * 2u32.pow(n);
                    debug!(?delay, "retrying after backoff");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("{label}: exhausted retries")))
}
