// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for LITP system-tests.
// Purpose: Provide fixtures, timeouts, and cleanup guards for all suites.
// Dependencies: litp-harness, system-tests
// ============================================================================

//! ## Overview
//! Shared helpers for LITP system-tests.
//! Purpose: Provide the test fixture, timeout policy, and model cleanup used
//! by every suite.
//! Invariants:
//! - Suites leave the MS in the state they found it; cleanup is best-effort
//!   but always attempted.
//! - Every wait is bounded; a timeout fails the test instead of hanging it.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod timeouts;
