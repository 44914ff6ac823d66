// crates/litp-harness/src/plan.rs
// ============================================================================
// Module: Plan Lifecycle
// Description: Plan state, show_plan parsing, and bounded plan waits.
// Purpose: Drive create/run/stop plan flows and inspect task ordering.
// Dependencies: cli, poll, exec
// ============================================================================

//! ## Overview
//! A plan is LITP's ordered set of phases and tasks converging deployed state
//! with the model. Suites create and run plans through the CLI, then poll
//! `show_plan` until the plan reaches an expected terminal state. The textual
//! `show_plan` output is parsed into a [`PlanSnapshot`] preserving phase and
//! task order, which ordering suites assert on directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use crate::cli::CliDriver;
use crate::cli::ExpectOutcome;
use crate::cluster::NodeHandle;
use crate::error::HarnessError;
use crate::exec::RemoteExecutor;
use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::poll::poll_until;

// ============================================================================
// SECTION: Plan States
// ============================================================================

/// Plan lifecycle states as printed by `show_plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// Created but not yet run.
    Initial,
    /// Currently executing tasks.
    Running,
    /// Stop requested, tasks draining.
    Stopping,
    /// Stopped before completion.
    Stopped,
    /// At least one task failed.
    Failed,
    /// All tasks completed successfully.
    Successful,
    /// Invalidated by a model change since creation.
    Invalid,
}

impl PlanState {
    /// The exact string `show_plan` prints for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
            Self::Stopped => "Stopped",
            Self::Failed => "Failed",
            Self::Successful => "Successful",
            Self::Invalid => "Invalid",
        }
    }

    /// Parses a `Plan Status:` value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Initial" => Some(Self::Initial),
            "Running" => Some(Self::Running),
            "Stopping" => Some(Self::Stopping),
            "Stopped" => Some(Self::Stopped),
            "Failed" => Some(Self::Failed),
            "Successful" => Some(Self::Successful),
            "Invalid" => Some(Self::Invalid),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task states as printed in `show_plan` phase listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not yet started.
    Initial,
    /// Currently executing.
    Running,
    /// Completed successfully.
    Success,
    /// Failed.
    Failed,
    /// Skipped because the plan was stopped.
    Stopped,
}

impl TaskState {
    /// The exact string `show_plan` prints for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Running => "Running",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Stopped => "Stopped",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Initial" => Some(Self::Initial),
            "Running" => Some(Self::Running),
            "Success" => Some(Self::Success),
            "Failed" => Some(Self::Failed),
            "Stopped" => Some(Self::Stopped),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Plan Snapshots
// ============================================================================

/// One task row from a `show_plan` phase listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTask {
    /// Task state at snapshot time.
    pub state: TaskState,
    /// Model path the task operates on.
    pub path: String,
    /// Human-readable task description.
    pub description: String,
}

/// One plan phase in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanPhase {
    /// Tasks in execution order.
    pub tasks: Vec<PlanTask>,
}

/// Parsed `show_plan` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSnapshot {
    /// Phases in execution order.
    pub phases: Vec<PlanPhase>,
    /// Overall plan state from the `Plan Status:` trailer.
    pub state: PlanState,
}

impl PlanSnapshot {
    /// Parses `show_plan` stdout lines.
    ///
    /// # Errors
    ///
    /// Returns an error when no `Plan Status:` trailer is present or a task
    /// row carries an unknown state.
    pub fn parse(lines: &[String]) -> Result<Self, HarnessError> {
        let mut phases: Vec<PlanPhase> = Vec::new();
        let mut state = None;
        let mut iter = lines.iter().peekable();
        while let Some(line) = iter.next() {
            let trimmed = line.trim();
            if trimmed.starts_with("Phase ") {
                phases.push(PlanPhase::default());
                continue;
            }
            if let Some(raw_state) = trimmed.strip_prefix("Plan Status:") {
                state = PlanState::parse(raw_state);
                continue;
            }
            let Some((raw_state, rest)) = trimmed.split_once(char::is_whitespace) else {
                continue;
            };
            let Some(task_state) = TaskState::parse(raw_state) else {
                continue;
            };
            let path = rest.trim();
            if !path.starts_with('/') {
                continue;
            }
            // Description follows indented under the path; long descriptions
            // wrap over several lines.
            let mut description = String::new();
            while let Some(next) = iter.peek() {
                let text = next.trim();
                if text.is_empty()
                    || text.starts_with("Phase ")
                    || text.starts_with("Plan Status:")
                    || text.starts_with("Tasks:")
                    || is_task_row(text)
                {
                    break;
                }
                if !description.is_empty() {
                    description.push(' ');
                }
                description.push_str(text);
                iter.next();
            }
            let Some(phase) = phases.last_mut() else {
                return Err(HarnessError::parse("show_plan", "task row before any phase"));
            };
            phase.tasks.push(PlanTask {
                state: task_state,
                path: path.to_string(),
                description,
            });
        }
        let Some(state) = state else {
            return Err(HarnessError::parse("show_plan", "missing Plan Status trailer"));
        };
        Ok(Self {
            phases,
            state,
        })
    }

    /// Tasks currently in `state`, in plan order.
    #[must_use]
    pub fn tasks_by_state(&self, state: TaskState) -> Vec<&PlanTask> {
        self.phases
            .iter()
            .flat_map(|phase| phase.tasks.iter())
            .filter(|task| task.state == state)
            .collect()
    }

    /// All tasks in plan order.
    #[must_use]
    pub fn all_tasks(&self) -> Vec<&PlanTask> {
        self.phases.iter().flat_map(|phase| phase.tasks.iter()).collect()
    }
}

/// True when a trimmed line is a `<state> /model/path` task row.
fn is_task_row(text: &str) -> bool {
    text.split_once(char::is_whitespace).is_some_and(|(state, rest)| {
        TaskState::parse(state).is_some() && rest.trim().starts_with('/')
    })
}

// ============================================================================
// SECTION: Plan Driver
// ============================================================================

/// Executor-backed plan lifecycle operations against the MS.
#[derive(Clone)]
pub struct PlanDriver {
    cli: CliDriver,
}

impl PlanDriver {
    /// Builds a driver over the given executor.
    #[must_use]
    pub fn new(exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            cli: CliDriver::new(exec),
        }
    }

    /// Fetches and parses `show_plan`.
    ///
    /// # Errors
    ///
    /// Returns an error when no plan exists or the output cannot be parsed.
    pub async fn show_plan(&self, node: &NodeHandle) -> Result<PlanSnapshot, HarnessError> {
        let result =
            self.cli.execute_cli_showplan_cmd(node, "", ExpectOutcome::Positive).await?;
        PlanSnapshot::parse(&result.stdout)
    }

    /// Returns the current plan state.
    ///
    /// # Errors
    ///
    /// Returns an error when no plan exists or the output cannot be parsed.
    pub async fn current_plan_state(
        &self,
        node: &NodeHandle,
    ) -> Result<PlanState, HarnessError> {
        Ok(self.show_plan(node).await?.state)
    }

    /// Polls until the plan reaches `state`; `Ok(false)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when `show_plan` itself fails.
    pub async fn wait_for_plan_state(
        &self,
        node: &NodeHandle,
        state: PlanState,
        timeout: Duration,
    ) -> Result<bool, HarnessError> {
        poll_until(timeout, DEFAULT_POLL_INTERVAL, || async {
            Ok(self.current_plan_state(node).await? == state)
        })
        .await
    }

    /// Polls until a task whose description contains `needle` reaches `state`.
    ///
    /// # Errors
    ///
    /// Returns an error when `show_plan` itself fails.
    pub async fn wait_for_task_state(
        &self,
        node: &NodeHandle,
        needle: &str,
        state: TaskState,
        timeout: Duration,
    ) -> Result<bool, HarnessError> {
        poll_until(timeout, DEFAULT_POLL_INTERVAL, || async {
            let snapshot = self.show_plan(node).await?;
            Ok(snapshot
                .all_tasks()
                .iter()
                .any(|task| task.state == state && task.description.contains(needle)))
        })
        .await
    }

    /// Creates and runs a plan, then requires it to reach `expected` within
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when any CLI verb fails or the plan does not reach
    /// `expected` in time.
    pub async fn run_and_check_plan(
        &self,
        node: &NodeHandle,
        expected: PlanState,
        timeout: Duration,
    ) -> Result<(), HarnessError> {
        self.cli.execute_cli_createplan_cmd(node, ExpectOutcome::Positive).await?;
        self.cli.execute_cli_runplan_cmd(node, ExpectOutcome::Positive).await?;
        if self.wait_for_plan_state(node, expected, timeout).await? {
            return Ok(());
        }
        Err(HarnessError::Timeout {
            timeout,
            waiting_for: format!("plan state {expected}"),
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
