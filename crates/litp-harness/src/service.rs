// crates/litp-harness/src/service.rs
// ============================================================================
// Module: Remote Service Control
// Description: systemctl-driven service operations on cluster nodes.
// Purpose: Start, stop, and probe services, including litpd itself.
// Dependencies: exec, poll, constants
// ============================================================================

//! ## Overview
//! Service operations run `systemctl` as root on the target node. Positive
//! variants error on failure; the `try_*` variants hand back the raw output so
//! suites can assert on failure text (the package-removal scenario checks the
//! literal systemd message after the unit has been uninstalled).
//!
//! Restarting litpd waits for the CLI to answer again before returning, so a
//! suite never races the daemon's startup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cluster::NodeHandle;
use crate::constants::LITP_PATH;
use crate::constants::SYSTEMCTL_PATH;
use crate::error::HarnessError;
use crate::exec::CommandResult;
use crate::exec::RemoteExecutor;
use crate::exec::RunOptions;
use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::poll::poll_until;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bound on litpd restart readiness.
const LITPD_RESTART_TIMEOUT: Duration = Duration::from_secs(180);

// ============================================================================
// SECTION: Service Driver
// ============================================================================

/// systemctl-backed service operations.
#[derive(Clone)]
pub struct ServiceDriver {
    exec: Arc<dyn RemoteExecutor>,
}

impl ServiceDriver {
    /// Builds a driver over the given executor.
    #[must_use]
    pub fn new(exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            exec,
        }
    }

    async fn systemctl(
        &self,
        node: &NodeHandle,
        verb: &str,
        service: &str,
    ) -> Result<CommandResult, HarnessError> {
        let cmd = format!("{SYSTEMCTL_PATH} {verb} {service}");
        info!(node = %node.filename, %cmd, "service control");
        self.exec.run(node, &cmd, &RunOptions::as_root()).await
    }

    /// Starts a service; errors when systemctl reports failure.
    ///
    /// # Errors
    ///
    /// Returns an expectation error carrying the systemctl output on failure.
    pub async fn start_service(
        &self,
        node: &NodeHandle,
        service: &str,
    ) -> Result<(), HarnessError> {
        let result = self.try_start_service(node, service).await?;
        require_clean(node, &format!("start {service}"), &result)
    }

    /// Starts a service and returns the raw output without asserting.
    ///
    /// systemd reports start failures on stdout of the remote shell, so a
    /// missing unit shows up as a stdout line.
    ///
    /// # Errors
    ///
    /// Returns an error only when the command cannot be executed at all.
    pub async fn try_start_service(
        &self,
        node: &NodeHandle,
        service: &str,
    ) -> Result<CommandResult, HarnessError> {
        // Fold stderr into stdout: systemd writes its diagnostics there and
        // the original suites assert on them as stdout lines.
        let cmd = format!("{SYSTEMCTL_PATH} start {service} 2>&1");
        info!(node = %node.filename, %cmd, "service control");
        self.exec.run(node, &cmd, &RunOptions::as_root()).await
    }

    /// Stops a service; errors when systemctl reports failure.
    ///
    /// # Errors
    ///
    /// Returns an expectation error carrying the systemctl output on failure.
    pub async fn stop_service(
        &self,
        node: &NodeHandle,
        service: &str,
    ) -> Result<(), HarnessError> {
        let result = self.systemctl(node, "stop", service).await?;
        require_clean(node, &format!("stop {service}"), &result)
    }

    /// Restarts a service; errors when systemctl reports failure.
    ///
    /// # Errors
    ///
    /// Returns an expectation error carrying the systemctl output on failure.
    pub async fn restart_service(
        &self,
        node: &NodeHandle,
        service: &str,
    ) -> Result<(), HarnessError> {
        let result = self.systemctl(node, "restart", service).await?;
        require_clean(node, &format!("restart {service}"), &result)
    }

    /// Returns `is-active` output and rc for a service.
    ///
    /// # Errors
    ///
    /// Returns an error only when the command cannot be executed at all.
    pub async fn service_status(
        &self,
        node: &NodeHandle,
        service: &str,
    ) -> Result<CommandResult, HarnessError> {
        self.systemctl(node, "is-active", service).await
    }

    /// Restarts litpd on the MS and waits for the CLI to answer again.
    ///
    /// # Errors
    ///
    /// Returns an error when the restart fails or the CLI does not come back
    /// within the readiness bound.
    pub async fn restart_litpd_service(&self, ms: &NodeHandle) -> Result<(), HarnessError> {
        self.restart_service(ms, "litpd").await?;
        let ready = poll_until(LITPD_RESTART_TIMEOUT, DEFAULT_POLL_INTERVAL, || async {
            let probe = format!("{LITP_PATH} show -p /");
            let result = self.exec.run(ms, &probe, &RunOptions::default()).await?;
            Ok(result.rc == 0)
        })
        .await?;
        if ready {
            return Ok(());
        }
        Err(HarnessError::Timeout {
            timeout: LITPD_RESTART_TIMEOUT,
            waiting_for: "litpd to answer after restart".to_string(),
        })
    }
}

fn require_clean(
    node: &NodeHandle,
    action: &str,
    result: &CommandResult,
) -> Result<(), HarnessError> {
    if result.rc == 0 {
        return Ok(());
    }
    Err(HarnessError::Expectation {
        node: node.filename.clone(),
        cmd: action.to_string(),
        rc: result.rc,
        stderr: result.stderr.clone(),
    })
}
