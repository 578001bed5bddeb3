//! Fixed-interval polling with a deadline and cancellation.

use crate::{Error, Result};
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay before each fetch.
    pub interval: Duration,
    /// Total time allowed for the whole loop.
    pub timeout: Duration,
}

/// Repeatedly calls `fetch` until `is_done` accepts its result.
///
/// `initial` is checked first, so an already-finished value costs no I/O.
/// Each fetch is preceded by a sleep of `settings.interval`. The loop fails
/// with [`Error::PollTimeout`] once `settings.timeout` has elapsed and with
/// [`Error::Cancelled`] as soon as `cancel` fires. Errors returned by
/// `fetch` stop the loop and are returned unchanged.
pub async fn poll_until<T, F, Fut, P>(
    initial: T,
    settings: PollSettings,
    cancel: &CancellationToken,
    fetch: F,
    is_done: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    if is_done(&initial) {
        return Ok(initial);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        outcome = tokio::time::timeout(settings.timeout, poll_loop(settings.interval, fetch, &is_done)) => {
            outcome.unwrap_or_else(|_| Err(Error::PollTimeout { timeout: settings.timeout }))
        }
    }
}

async fn poll_loop<T, F, Fut, P>(interval: Duration, mut fetch: F, is_done: &P) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    let mut attempt: u32 = 0;
    loop {
        tokio::time::sleep(interval).await;
        attempt += 1;

        let current = fetch().await?;
        if is_done(&current) {
            debug!("Poll finished after {} attempt(s)", attempt);
            return Ok(current);
        }
    }
}
