// crates/litp-harness/src/poll.rs
// ============================================================================
// Module: Bounded Polling
// Description: Sleep-based retries with hard timeouts over remote state.
// Purpose: Provide the wait_for_* engine shared by plan, log, and cmd waits.
// Dependencies: tokio, tracing
// ============================================================================

//! ## Overview
//! Every `wait_for_*` helper in the harness is a bounded poll: re-evaluate a
//! predicate at a fixed interval until it holds or the timeout elapses. A
//! timeout is reported as `false`, never as a hang; suites decide whether a
//! `false` is a test failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;
use std::time::Instant;

use tokio::time::sleep;
use tracing::debug;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default interval between predicate evaluations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

// ============================================================================
// SECTION: Polling Engine
// ============================================================================

/// Re-evaluates `predicate` every `interval` until it returns `true` or
/// `timeout` elapses.
///
/// Returns `Ok(false)` on timeout. Predicate errors abort the poll
/// immediately; a condition that can never be evaluated is not worth waiting
/// out.
///
/// # Errors
///
/// Propagates the first error returned by `predicate`.
pub async fn poll_until<F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut predicate: F,
) -> Result<bool, HarnessError>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<bool, HarnessError>> + Send,
{
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        if predicate().await? {
            debug!(attempts, elapsed = ?start.elapsed(), "poll condition reached");
            return Ok(true);
        }
        if start.elapsed() + interval > timeout {
            debug!(attempts, ?timeout, "poll condition timed out");
            return Ok(false);
        }
        sleep(interval).await;
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
