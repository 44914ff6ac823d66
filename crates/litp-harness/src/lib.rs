// crates/litp-harness/src/lib.rs
// ============================================================================
// Module: LITP Harness Library
// Description: Shared harness primitives for black-box LITP system tests.
// Purpose: Provide remote execution, CLI drivers, REST access, and polling.
// Dependencies: tokio, reqwest, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate is the capability surface every LITP system-test suite depends
//! on: node handles for the deployment under test, SSH command execution, LITP
//! CLI verb drivers, a REST client for the litpd API, bounded polling helpers,
//! and the literal path constants shared across suites.
//!
//! The harness owns no model or plan state of its own. Every operation drives
//! a live LITP installation and reports what it observed; assertions belong to
//! the suites.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cli;
pub mod cluster;
pub mod constants;
pub mod error;
pub mod exec;
pub mod fs;
pub mod harness;
pub mod model;
pub mod plan;
pub mod poll;
pub mod rest;
pub mod service;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use cli::CliDriver;
pub use cli::CliUtils;
pub use cli::ExpectOutcome;
pub use cluster::ClusterConfig;
pub use cluster::NodeHandle;
pub use cluster::NodeType;
pub use error::HarnessError;
pub use exec::CommandResult;
pub use exec::LocalExecutor;
pub use exec::RemoteExecutor;
pub use exec::RunOptions;
pub use exec::SshExecutor;
pub use harness::LitpHarness;
pub use model::ItemState;
pub use plan::PlanSnapshot;
pub use plan::PlanState;
pub use plan::TaskState;
pub use rest::RestClient;
