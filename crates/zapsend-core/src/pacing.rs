// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellable timing primitives.
//!
//! Every suspension point in zapsend (pairing retries, connection polling,
//! and the inter-send delay) goes through this module, so cancellation and
//! timeouts compose in one place instead of hiding in loop conditions.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ZapsendError;

/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// How a [`poll_until`] loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The probe reported readiness.
    Ready,
    /// The overall deadline passed first.
    TimedOut,
    /// The cancellation token fired first.
    Cancelled,
}

/// Sleeps for `duration` unless `cancel` fires first.
///
/// A zero duration returns immediately, but still honours an
/// already-cancelled token.
pub async fn pause(duration: Duration, cancel: &CancellationToken) -> Result<(), ZapsendError> {
    if cancel.is_cancelled() {
        return Err(ZapsendError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ZapsendError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// Runs `probe` every `interval` until it returns `true`, `timeout` elapses,
/// or `cancel` fires.
///
/// The first probe runs immediately. The deadline is wall-clock and
/// independent of how long each probe takes; a probe in flight when the
/// deadline passes is abandoned.
pub async fn poll_until<F, Fut>(
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut probe: F,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let now = Instant::now();
    let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
    let deadline = tokio::time::sleep_until(deadline);
    tokio::pin!(deadline);

    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut probes = 0u32;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = &mut deadline => {
                debug!(probes, ?timeout, "poll deadline reached");
                return PollOutcome::TimedOut;
            }
            _ = ticker.tick() => {
                probes += 1;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return PollOutcome::Cancelled,
                    _ = &mut deadline => {
                        debug!(probes, ?timeout, "poll deadline reached during probe");
                        return PollOutcome::TimedOut;
                    }
                    ready = probe() => {
                        if ready {
                            return PollOutcome::Ready;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pause_waits_full_duration() {
        let cancel = CancellationToken::new();
        let start = Instant::now();
        pause(Duration::from_secs(5), &cancel).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_aborts_on_cancel() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });
        let start = Instant::now();
        let result = pause(Duration::from_secs(60), &cancel).await;
        assert!(matches!(result, Err(ZapsendError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn zero_pause_still_honours_cancelled_token() {
        let cancel = CancellationToken::new();
        assert!(pause(Duration::ZERO, &cancel).await.is_ok());
        cancel.cancel();
        assert!(matches!(
            pause(Duration::ZERO, &cancel).await,
            Err(ZapsendError::Cancelled)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn poll_returns_ready_on_first_probe() {
        let cancel = CancellationToken::new();
        let start = Instant::now();
        let outcome = poll_until(
            Duration::from_secs(2),
            Duration::from_secs(10),
            &cancel,
            || async { true },
        )
        .await;
        assert_eq!(outcome, PollOutcome::Ready);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_times_out_at_deadline() {
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let start = Instant::now();
        let outcome = poll_until(
            Duration::from_secs(2),
            Duration::from_secs(10),
            &cancel,
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { false }
            },
        )
        .await;
        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        // Probes at t = 0, 2, 4, 6, 8 and possibly 10.
        assert!(calls.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_becomes_ready_after_some_probes() {
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let start = Instant::now();
        let outcome = poll_until(
            Duration::from_secs(2),
            Duration::from_secs(60),
            &cancel,
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { n == 3 }
            },
        )
        .await;
        assert_eq!(outcome, PollOutcome::Ready);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_timeout_still_polls() {
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let outcome = poll_until(
            Duration::from_secs(2),
            Duration::from_secs(u64::MAX),
            &cancel,
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { n == 2 }
            },
        )
        .await;
        assert_eq!(outcome, PollOutcome::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_stops_on_cancel() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = poll_until(
            Duration::from_secs(2),
            Duration::from_secs(60),
            &cancel,
            || async { false },
        )
        .await;
        assert_eq!(outcome, PollOutcome::Cancelled);
    }
}
