// crates/litp-harness/src/harness.rs
// ============================================================================
// Module: Test Harness Fixture
// Description: The shared fixture every system-test suite builds on.
// Purpose: Tie cluster, executor, CLI, model, plan, REST, and file drivers.
// Dependencies: cluster, exec, cli, model, plan, rest, service, fs, poll
// ============================================================================

//! ## Overview
//! [`LitpHarness`] is the Rust rendition of the shared test base the original
//! suites subclassed: one value holding the cluster map and the executor, with
//! accessors for every driver and the cross-cutting helpers (`run_command`,
//! `wait_for_cmd`, `wait_for_log_msg`, `wait_for_puppet_idle`). Suites acquire
//! one per test, do their arrange/act/assert, and run their cleanup against
//! the same fixture.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cli::CliDriver;
use crate::cluster::ClusterConfig;
use crate::cluster::NodeHandle;
use crate::constants::GREP_PATH;
use crate::constants::PUPPET_AGENT_LOCK_FILE;
use crate::error::HarnessError;
use crate::exec::CommandResult;
use crate::exec::RemoteExecutor;
use crate::exec::RunOptions;
use crate::exec::SshExecutor;
use crate::exec::shell_quote;
use crate::fs::FileDriver;
use crate::model::ModelReader;
use crate::plan::PlanDriver;
use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::poll::poll_until;
use crate::rest::RestClient;
use crate::service::ServiceDriver;

// ============================================================================
// SECTION: Text Helpers
// ============================================================================

/// True when any line contains `needle`; the original suites' ubiquitous
/// `is_text_in_list`.
#[must_use]
pub fn is_text_in_list(needle: &str, lines: &[String]) -> bool {
    lines.iter().any(|line| line.contains(needle))
}

// ============================================================================
// SECTION: Harness Fixture
// ============================================================================

/// Shared fixture for one system test.
pub struct LitpHarness {
    cluster: ClusterConfig,
    exec: Arc<dyn RemoteExecutor>,
}

impl LitpHarness {
    /// Builds a harness from an explicit cluster map and executor.
    #[must_use]
    pub fn new(cluster: ClusterConfig, exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            cluster,
            exec,
        }
    }

    /// Builds a harness from `LITP_SYSTEM_TEST_CONFIG` using SSH.
    ///
    /// # Errors
    ///
    /// Returns an error when the cluster configuration cannot be loaded.
    pub fn from_env() -> Result<Self, HarnessError> {
        let cluster = ClusterConfig::from_env()?;
        Ok(Self::new(cluster, Arc::new(SshExecutor::new())))
    }

    /// The cluster map.
    #[must_use]
    pub const fn cluster(&self) -> &ClusterConfig {
        &self.cluster
    }

    /// The management server handle.
    #[must_use]
    pub const fn management_node(&self) -> &NodeHandle {
        self.cluster.management_node()
    }

    /// The managed node handles.
    #[must_use]
    pub fn managed_nodes(&self) -> &[NodeHandle] {
        self.cluster.managed_nodes()
    }

    /// CLI verb driver.
    #[must_use]
    pub fn cli(&self) -> CliDriver {
        CliDriver::new(Arc::clone(&self.exec))
    }

    /// Model tree reader.
    #[must_use]
    pub fn model(&self) -> ModelReader {
        ModelReader::new(Arc::clone(&self.exec))
    }

    /// Plan lifecycle driver.
    #[must_use]
    pub fn plans(&self) -> PlanDriver {
        PlanDriver::new(Arc::clone(&self.exec))
    }

    /// Service control driver.
    #[must_use]
    pub fn services(&self) -> ServiceDriver {
        ServiceDriver::new(Arc::clone(&self.exec))
    }

    /// Remote file driver.
    #[must_use]
    pub fn files(&self) -> FileDriver {
        FileDriver::new(Arc::clone(&self.exec))
    }

    /// REST client against the MS litpd endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint URL cannot be built.
    pub fn rest(&self) -> Result<RestClient, HarnessError> {
        RestClient::for_node(self.management_node())
    }

    // ------------------------------------------------------------------
    // Cross-cutting helpers
    // ------------------------------------------------------------------

    /// Runs an arbitrary shell command on a node.
    ///
    /// With `default_asserts` a non-zero rc or stderr output is an error.
    ///
    /// # Errors
    ///
    /// Returns transport errors, and expectation errors under
    /// `default_asserts`.
    pub async fn run_command(
        &self,
        node: &NodeHandle,
        cmd: &str,
        opts: &RunOptions,
        default_asserts: bool,
    ) -> Result<CommandResult, HarnessError> {
        info!(node = %node.filename, %cmd, "run_command");
        let result = self.exec.run(node, cmd, opts).await?;
        if default_asserts && !result.is_clean() {
            return Err(HarnessError::Expectation {
                node: node.filename.clone(),
                cmd: cmd.to_string(),
                rc: result.rc,
                stderr: result.stderr,
            });
        }
        Ok(result)
    }

    /// Reruns a command until it exits with `expected_rc`; `Ok(false)` on
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be executed at all.
    pub async fn wait_for_cmd(
        &self,
        node: &NodeHandle,
        cmd: &str,
        expected_rc: i32,
        timeout: Duration,
    ) -> Result<bool, HarnessError> {
        poll_until(timeout, DEFAULT_POLL_INTERVAL, || async {
            let result = self.exec.run(node, cmd, &RunOptions::default()).await?;
            Ok(result.rc == expected_rc)
        })
        .await
    }

    /// Watches a remote log for a substring appearing after `from_line`;
    /// `Ok(false)` on timeout.
    ///
    /// Callers capture `from_line` with [`FileDriver::file_len`] before the
    /// action under test so earlier occurrences cannot satisfy the wait.
    ///
    /// # Errors
    ///
    /// Returns an error when the log cannot be read.
    pub async fn wait_for_log_msg(
        &self,
        node: &NodeHandle,
        log_path: &str,
        needle: &str,
        from_line: usize,
        timeout: Duration,
    ) -> Result<bool, HarnessError> {
        let tail_cmd = format!(
            "tail -n +{} {log_path} | {GREP_PATH} -F -- {}",
            from_line.saturating_add(1),
            shell_quote(needle),
        );
        poll_until(timeout, DEFAULT_POLL_INTERVAL, || async {
            let result = self.exec.run(node, &tail_cmd, &RunOptions::as_root()).await?;
            Ok(result.rc == 0)
        })
        .await
    }

    /// Waits until no Puppet agent catalog run is in progress on the node;
    /// `Ok(false)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the lock probe cannot run.
    pub async fn wait_for_puppet_idle(
        &self,
        node: &NodeHandle,
        timeout: Duration,
    ) -> Result<bool, HarnessError> {
        poll_until(timeout, DEFAULT_POLL_INTERVAL, || async {
            let probe = format!("test ! -e {PUPPET_AGENT_LOCK_FILE}");
            let result = self.exec.run(node, &probe, &RunOptions::as_root()).await?;
            Ok(result.rc == 0)
        })
        .await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
