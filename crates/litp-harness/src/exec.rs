// crates/litp-harness/src/exec.rs
// ============================================================================
// Module: Remote Execution
// Description: Command execution against cluster nodes over SSH.
// Purpose: Provide the run_command primitive every harness operation builds on.
// Dependencies: async-trait, tokio, tracing
// ============================================================================

//! ## Overview
//! All harness traffic that is not REST goes through [`RemoteExecutor::run`]:
//! a command string, a target node, and options (root escalation, timeout).
//! The production implementation shells out to the system `ssh` client; a
//! local implementation runs the same contract against `sh -c` so the harness
//! itself can be tested without a deployment.
//!
//! Output is carried as lines, matching how suites assert on it: the original
//! LITP suites compare expected strings against lists of output lines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::cluster::NodeHandle;
use crate::error::HarnessError;

// ============================================================================
// SECTION: Command Results
// ============================================================================

/// Captured output of one remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Standard output split into lines, trailing newline dropped.
    pub stdout: Vec<String>,
    /// Standard error split into lines, trailing newline dropped.
    pub stderr: Vec<String>,
    /// Process return code; -1 when the process died without one.
    pub rc: i32,
}

impl CommandResult {
    /// Builds a result from raw byte output.
    #[must_use]
    pub fn from_raw(stdout: &[u8], stderr: &[u8], rc: i32) -> Self {
        Self {
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
            rc,
        }
    }

    /// True when any stdout line contains `needle`.
    #[must_use]
    pub fn stdout_contains(&self, needle: &str) -> bool {
        self.stdout.iter().any(|line| line.contains(needle))
    }

    /// True when any stderr line contains `needle`.
    #[must_use]
    pub fn stderr_contains(&self, needle: &str) -> bool {
        self.stderr.iter().any(|line| line.contains(needle))
    }

    /// True for rc 0 with no stderr output, the default success shape.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rc == 0 && self.stderr.is_empty()
    }
}

fn split_lines(raw: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.strip_suffix('\n').unwrap_or(&text);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(str::to_string).collect()
}

// ============================================================================
// SECTION: Shell Quoting
// ============================================================================

/// Single-quotes a string for safe interpolation into a remote shell command.
pub(crate) fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

// ============================================================================
// SECTION: Run Options
// ============================================================================

/// Default per-command execution timeout.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(120);

/// Options for one remote command execution.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run the command as root instead of the node's configured account.
    pub su_root: bool,
    /// Override the login account for this command only.
    pub username: Option<String>,
    /// Upper bound on command duration.
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            su_root: false,
            username: None,
            timeout: DEFAULT_CMD_TIMEOUT,
        }
    }
}

impl RunOptions {
    /// Options for running a command as root.
    #[must_use]
    pub fn as_root() -> Self {
        Self {
            su_root: true,
            ..Self::default()
        }
    }
}

// ============================================================================
// SECTION: Executor Trait
// ============================================================================

/// Executes shell commands on cluster nodes.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Runs `cmd` on `node` and captures its output.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be spawned or transported, or
    /// when it exceeds the timeout in `opts`. A non-zero return code is not an
    /// error at this layer.
    async fn run(
        &self,
        node: &NodeHandle,
        cmd: &str,
        opts: &RunOptions,
    ) -> Result<CommandResult, HarnessError>;
}

// ============================================================================
// SECTION: SSH Executor
// ============================================================================

/// Executor shelling out to the system `ssh` client.
///
/// Password-less key authentication against the deployment is a precondition,
/// as it is for the original suite's node setup. `su_root` logs in as root
/// directly rather than wrapping the command in `su`.
#[derive(Debug, Clone, Default)]
pub struct SshExecutor {
    /// Extra `-o` options appended to every invocation.
    extra_options: Vec<String>,
}

impl SshExecutor {
    /// Builds an executor with the default option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an `ssh -o` option to every invocation.
    #[must_use]
    pub fn with_option(mut self, option: &str) -> Self {
        self.extra_options.push(option.to_string());
        self
    }

    fn login_user<'a>(node: &'a NodeHandle, opts: &'a RunOptions) -> &'a str {
        if opts.su_root {
            return "root";
        }
        opts.username.as_deref().unwrap_or(&node.username)
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(
        &self,
        node: &NodeHandle,
        cmd: &str,
        opts: &RunOptions,
    ) -> Result<CommandResult, HarnessError> {
        let user = Self::login_user(node, opts);
        let target = format!("{user}@{}", node.ipv4);
        debug!(node = %node.filename, %user, %cmd, "running remote command");
        let mut ssh = Command::new("ssh");
        ssh.arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg("StrictHostKeyChecking=no")
            .arg("-o")
            .arg("UserKnownHostsFile=/dev/null");
        for option in &self.extra_options {
            ssh.arg("-o").arg(option);
        }
        ssh.arg(&target).arg(cmd).stdin(Stdio::null());
        run_with_timeout(ssh, &node.filename, cmd, opts.timeout).await
    }
}

// ============================================================================
// SECTION: Local Executor
// ============================================================================

/// Executor running commands on the local host through `sh -c`.
///
/// Used by the harness's own tests; honours the same result contract as
/// [`SshExecutor`] minus the network hop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor;

#[async_trait]
impl RemoteExecutor for LocalExecutor {
    async fn run(
        &self,
        node: &NodeHandle,
        cmd: &str,
        opts: &RunOptions,
    ) -> Result<CommandResult, HarnessError> {
        debug!(node = %node.filename, %cmd, "running local command");
        let mut sh = Command::new("sh");
        sh.arg("-c").arg(cmd).stdin(Stdio::null());
        run_with_timeout(sh, &node.filename, cmd, opts.timeout).await
    }
}

// ============================================================================
// SECTION: Process Plumbing
// ============================================================================

async fn run_with_timeout(
    mut command: Command,
    node: &str,
    cmd: &str,
    timeout: Duration,
) -> Result<CommandResult, HarnessError> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
    let child = command.output();
    let output = tokio::time::timeout(timeout, child).await.map_err(|_| {
        HarnessError::Timeout {
            timeout,
            waiting_for: format!("`{cmd}` on {node}"),
        }
    })?;
    let output = output.map_err(|err| HarnessError::exec(node, err.to_string()))?;
    let rc = output.status.code().unwrap_or(-1);
    Ok(CommandResult::from_raw(&output.stdout, &output.stderr, rc))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
