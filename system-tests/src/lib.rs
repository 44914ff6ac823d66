// system-tests/src/lib.rs
// ============================================================================
// Module: LITP System Tests Library
// Description: Shared configuration for LITP system-test scenarios.
// Purpose: Provide common utilities for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration utilities used by the LITP
//! system-test binaries in `system-tests/tests`. The suites themselves drive
//! a live LITP deployment named by `LITP_SYSTEM_TEST_CONFIG` and only run
//! under `--features system-tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
