// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// ============================================================================

//! ## Overview
//! Plan runs against a real deployment take minutes; CLI round trips take
//! seconds. `LITP_SYSTEM_TEST_TIMEOUT_SEC` raises every timeout to at least
//! the configured floor on slow environments without shortening explicitly
//! longer ones.

use std::env;
use std::time::Duration;

const ENV_TIMEOUT_SECS: &str = "LITP_SYSTEM_TEST_TIMEOUT_SEC";

/// Bound for one plan run to completion.
pub const PLAN_TIMEOUT: Duration = Duration::from_secs(600);

/// Bound for a single state or log wait.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(180);

/// Returns the effective timeout, honoring `LITP_SYSTEM_TEST_TIMEOUT_SEC`
/// when set. The override acts as a minimum to avoid shortening explicitly
/// longer test timeouts.
#[must_use]
pub fn resolve_timeout(requested: Duration) -> Duration {
    match env::var(ENV_TIMEOUT_SECS) {
        Ok(raw) => match parse_timeout_secs(&raw) {
            Ok(override_timeout) => std::cmp::max(requested, override_timeout),
            Err(_) => requested,
        },
        Err(_) => requested,
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("must be a positive integer number of seconds".to_string());
    }
    let secs: u64 =
        trimmed.parse().map_err(|_| "must be a positive integer number of seconds".to_string())?;
    if secs == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}
