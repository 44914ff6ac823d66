// crates/litp-harness/src/cli.rs
// ============================================================================
// Module: LITP CLI Drivers
// Description: Command builders and executor-backed drivers for litp verbs.
// Purpose: Issue create/update/remove/inherit/plan verbs with expectations.
// Dependencies: exec, constants, tracing
// ============================================================================

//! ## Overview
//! [`CliUtils`] builds `litp` command strings without performing any I/O, so
//! builders are testable in isolation and reusable for display in failure
//! messages. [`CliDriver`] runs a built command on the MS through a
//! [`RemoteExecutor`] and enforces the caller's expectation:
//!
//! - [`ExpectOutcome::Positive`]: return code 0 and empty stderr;
//! - [`ExpectOutcome::Negative`]: non-zero return code and empty stdout.
//!
//! A violated expectation is an error carrying the full command and output,
//! which is what a failed suite prints.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::info;

use crate::cluster::NodeHandle;
use crate::constants::LITP_PATH;
use crate::error::HarnessError;
use crate::exec::CommandResult;
use crate::exec::RemoteExecutor;
use crate::exec::RunOptions;
use crate::exec::shell_quote;

// ============================================================================
// SECTION: Command Builders
// ============================================================================

/// Builders for `litp` CLI command strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliUtils;

impl CliUtils {
    /// Normalizes a property string for interpolation into a remote shell
    /// command.
    ///
    /// Tokens without a `=` are folded back into the value of the preceding
    /// assignment, and any assignment the remote shell would word-split or
    /// expand is single-quoted, so `description=hello world` survives the ssh
    /// round trip as one `-o` argument.
    #[must_use]
    pub fn format_props(props: &str) -> String {
        let mut assignments: Vec<String> = Vec::new();
        for token in props.split_whitespace() {
            match assignments.last_mut() {
                Some(last) if !token.contains('=') => {
                    last.push(' ');
                    last.push_str(token);
                }
                _ => assignments.push(token.to_string()),
            }
        }
        assignments
            .iter()
            .map(|assignment| {
                if needs_quoting(assignment) {
                    shell_quote(assignment)
                } else {
                    assignment.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `litp create -p <path> -t <type> [-o <props>]`.
    #[must_use]
    pub fn get_create_cmd(path: &str, item_type: &str, props: &str) -> String {
        if props.is_empty() {
            return format!("{LITP_PATH} create -p {path} -t {item_type}");
        }
        format!(
            "{LITP_PATH} create -p {path} -t {item_type} -o {}",
            Self::format_props(props)
        )
    }

    /// `litp update -p <path> -o <props>`.
    #[must_use]
    pub fn get_update_cmd(path: &str, props: &str) -> String {
        format!("{LITP_PATH} update -p {path} -o {}", Self::format_props(props))
    }

    /// `litp update -p <path> -d <props>` removing the named properties.
    #[must_use]
    pub fn get_update_delete_cmd(path: &str, props: &str) -> String {
        format!("{LITP_PATH} update -p {path} -d {props}")
    }

    /// `litp remove -p <path>`.
    #[must_use]
    pub fn get_remove_cmd(path: &str) -> String {
        format!("{LITP_PATH} remove -p {path}")
    }

    /// `litp inherit -p <path> -s <source> [-o <props>]`.
    #[must_use]
    pub fn get_inherit_cmd(path: &str, source: &str, props: &str) -> String {
        if props.is_empty() {
            return format!("{LITP_PATH} inherit -p {path} -s {source}");
        }
        format!(
            "{LITP_PATH} inherit -p {path} -s {source} -o {}",
            Self::format_props(props)
        )
    }

    /// `litp export -p <path> [-f <file>]`; without a file the XML goes to
    /// stdout.
    #[must_use]
    pub fn get_export_cmd(path: &str, file: &str) -> String {
        if file.is_empty() {
            return format!("{LITP_PATH} export -p {path}");
        }
        format!("{LITP_PATH} export -p {path} -f {file}")
    }

    /// `litp load -p <path> -f <file> [--merge|--replace]`.
    #[must_use]
    pub fn get_load_cmd(path: &str, file: &str, args: &str) -> String {
        if args.is_empty() {
            return format!("{LITP_PATH} load -p {path} -f {file}");
        }
        format!("{LITP_PATH} load -p {path} -f {file} {args}")
    }

    /// `litp show -p <path>` with optional extra args (`-r`, `-j`, ...).
    #[must_use]
    pub fn get_show_cmd(path: &str, args: &str) -> String {
        if args.is_empty() {
            return format!("{LITP_PATH} show -p {path}");
        }
        format!("{LITP_PATH} show -p {path} {args}")
    }

    /// `litp import <source> <destination>`.
    #[must_use]
    pub fn get_import_cmd(source: &str, destination: &str) -> String {
        format!("{LITP_PATH} import {source} {destination}")
    }

    /// `litp create_plan`.
    #[must_use]
    pub fn get_create_plan_cmd() -> String {
        format!("{LITP_PATH} create_plan")
    }

    /// `litp run_plan`.
    #[must_use]
    pub fn get_run_plan_cmd() -> String {
        format!("{LITP_PATH} run_plan")
    }

    /// `litp stop_plan`.
    #[must_use]
    pub fn get_stop_plan_cmd() -> String {
        format!("{LITP_PATH} stop_plan")
    }

    /// `litp remove_plan`.
    #[must_use]
    pub fn get_remove_plan_cmd() -> String {
        format!("{LITP_PATH} remove_plan")
    }

    /// `litp show_plan [args]`.
    #[must_use]
    pub fn get_show_plan_cmd(args: &str) -> String {
        if args.is_empty() {
            return format!("{LITP_PATH} show_plan");
        }
        format!("{LITP_PATH} show_plan {args}")
    }

    /// `litp restore_model`.
    #[must_use]
    pub fn get_restore_model_cmd() -> String {
        format!("{LITP_PATH} restore_model")
    }
}

/// True when the remote shell would word-split or expand the assignment.
fn needs_quoting(assignment: &str) -> bool {
    !assignment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@".contains(c))
}

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Expected shape of a CLI invocation's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectOutcome {
    /// The verb must succeed: rc 0, empty stderr.
    Positive,
    /// The verb must be rejected: non-zero rc, empty stdout.
    Negative,
}

impl ExpectOutcome {
    fn check(
        self,
        node: &str,
        cmd: &str,
        result: &CommandResult,
    ) -> Result<(), HarnessError> {
        let violated = match self {
            Self::Positive => result.rc != 0 || !result.stderr.is_empty(),
            Self::Negative => result.rc == 0 || !result.stdout.is_empty(),
        };
        if violated {
            return Err(HarnessError::Expectation {
                node: node.to_string(),
                cmd: cmd.to_string(),
                rc: result.rc,
                stderr: result.stderr.clone(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Executor-backed Driver
// ============================================================================

/// Runs `litp` verbs on the MS and enforces outcome expectations.
#[derive(Clone)]
pub struct CliDriver {
    exec: Arc<dyn RemoteExecutor>,
}

impl CliDriver {
    /// Builds a driver over the given executor.
    #[must_use]
    pub fn new(exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            exec,
        }
    }

    /// Runs a pre-built CLI command and checks the expectation.
    ///
    /// # Errors
    ///
    /// Returns an error when the command cannot be executed or the observed
    /// outcome violates `expect`.
    pub async fn execute(
        &self,
        node: &NodeHandle,
        cmd: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        info!(node = %node.filename, %cmd, "litp cli");
        let result = self.exec.run(node, cmd, &RunOptions::default()).await?;
        expect.check(&node.filename, cmd, &result)?;
        Ok(result)
    }

    /// `litp create` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_create_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        item_type: &str,
        props: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_create_cmd(path, item_type, props), expect).await
    }

    /// `litp update` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_update_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        props: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_update_cmd(path, props), expect).await
    }

    /// `litp update -d` driver deleting the named properties.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_update_delete_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        props: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_update_delete_cmd(path, props), expect).await
    }

    /// `litp remove` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_remove_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_remove_cmd(path), expect).await
    }

    /// `litp inherit` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_inherit_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        source: &str,
        props: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_inherit_cmd(path, source, props), expect).await
    }

    /// `litp export` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_export_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        file: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_export_cmd(path, file), expect).await
    }

    /// `litp load` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_load_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        file: &str,
        args: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_load_cmd(path, file, args), expect).await
    }

    /// `litp show` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_show_cmd(
        &self,
        node: &NodeHandle,
        path: &str,
        args: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_show_cmd(path, args), expect).await
    }

    /// `litp create_plan` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_createplan_cmd(
        &self,
        node: &NodeHandle,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_create_plan_cmd(), expect).await
    }

    /// `litp run_plan` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_runplan_cmd(
        &self,
        node: &NodeHandle,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_run_plan_cmd(), expect).await
    }

    /// `litp stop_plan` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_stopplan_cmd(
        &self,
        node: &NodeHandle,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_stop_plan_cmd(), expect).await
    }

    /// `litp remove_plan` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_removeplan_cmd(
        &self,
        node: &NodeHandle,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_remove_plan_cmd(), expect).await
    }

    /// `litp show_plan` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_showplan_cmd(
        &self,
        node: &NodeHandle,
        args: &str,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_show_plan_cmd(args), expect).await
    }

    /// `litp restore_model` driver.
    ///
    /// # Errors
    ///
    /// Propagates execution and expectation failures.
    pub async fn execute_cli_restoremodel_cmd(
        &self,
        node: &NodeHandle,
        expect: ExpectOutcome,
    ) -> Result<CommandResult, HarnessError> {
        self.execute(node, &CliUtils::get_restore_model_cmd(), expect).await
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
