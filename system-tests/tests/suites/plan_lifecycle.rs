// system-tests/tests/suites/plan_lifecycle.rs
// ============================================================================
// Module: Plan Lifecycle Tests
// Description: Plan creation, running, stopping, removal and model restore.
// Purpose: Exercise the plan state machine end to end over the CLI.
// Dependencies: helpers, litp-harness
// ============================================================================

//! ## Overview
//! A plan moves from `Initial` through `Running` to a terminal state; these
//! scenarios drive that machine with real deployment changes. One scenario
//! stops a running plan and checks no task is left running, one asserts the
//! `DoNothingPlanError` contract for a converged model, and one verifies
//! `restore_model` discards uncommitted model edits.

use std::error::Error;

use litp_harness::ExpectOutcome;
use litp_harness::LitpHarness;
use litp_harness::PlanState;
use litp_harness::TaskState;
use litp_harness::harness::is_text_in_list;
use tracing::info;

use crate::helpers::cleanup::ModelCleanup;
use crate::helpers::fixture;
use crate::helpers::timeouts;

const TEST_PACKAGE: &str = "finger";

/// Creates a source package item and inherits it onto the first managed
/// node so a plan has real work to do. Returns the two created paths.
async fn stage_package_deployment(
    harness: &LitpHarness,
    item_id: &str,
    cleanup: &mut ModelCleanup,
) -> Result<(String, String), Box<dyn Error>> {
    let ms = harness.management_node().clone();
    let cli = harness.cli();
    let model = harness.model();

    let software_col =
        model.find(&ms, "/software", "collection-of-software-item", false).await?;
    let source_url = format!("{}/{item_id}", software_col[0]);
    cli.execute_cli_create_cmd(
        &ms,
        &source_url,
        "package",
        &format!("name={TEST_PACKAGE}"),
        ExpectOutcome::Positive,
    )
    .await?;
    cleanup.register(&source_url);
    cleanup.converge_with_plan();

    let node_url = model.find(&ms, "/deployments", "node", true).await?;
    let node_items_col =
        model.find(&ms, &node_url[0], "ref-collection-of-software-item", true).await?;
    let node_url = format!("{}/{item_id}", node_items_col[0]);
    cli.execute_cli_inherit_cmd(&ms, &node_url, &source_url, "", ExpectOutcome::Positive)
        .await?;
    cleanup.register(&node_url);
    Ok((source_url, node_url))
}

#[tokio::test(flavor = "multi_thread")]
async fn stopped_plan_leaves_no_running_tasks() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let mut cleanup = ModelCleanup::new();
    let outcome = async {
        let ms = harness.management_node().clone();
        let cli = harness.cli();
        let plans = harness.plans();
        let wait_timeout = timeouts::resolve_timeout(timeouts::WAIT_TIMEOUT);
        let plan_timeout = timeouts::resolve_timeout(timeouts::PLAN_TIMEOUT);

        info!("1. Stage a package deployment so the plan has tasks");
        stage_package_deployment(&harness, "lifecycle_pkg", &mut cleanup).await?;

        info!("2. Create the plan and check it starts in Initial");
        cli.execute_cli_createplan_cmd(&ms, ExpectOutcome::Positive).await?;
        let state = plans.current_plan_state(&ms).await?;
        if state != PlanState::Initial {
            return Err(format!("new plan is in state {state}, expected Initial").into());
        }

        info!("3. Run the plan and wait for it to be Running");
        cli.execute_cli_runplan_cmd(&ms, ExpectOutcome::Positive).await?;
        if !plans.wait_for_plan_state(&ms, PlanState::Running, wait_timeout).await? {
            // Short plans may finish before the first poll observes Running.
            let state = plans.current_plan_state(&ms).await?;
            if state != PlanState::Successful {
                return Err(format!("plan never ran, ended in state {state}").into());
            }
            return Ok(());
        }

        info!("4. Stop the plan and wait for it to settle");
        cli.execute_cli_stopplan_cmd(&ms, ExpectOutcome::Positive).await?;
        let stopped = plans.wait_for_plan_state(&ms, PlanState::Stopped, plan_timeout).await?;
        if !stopped {
            // The plan may have completed its final phase before stopping.
            let state = plans.current_plan_state(&ms).await?;
            if state != PlanState::Successful {
                return Err(format!("plan did not stop, state is {state}").into());
            }
        }

        info!("5. Check no task was left running");
        let snapshot = plans.show_plan(&ms).await?;
        let running = snapshot.tasks_by_state(TaskState::Running);
        if !running.is_empty() {
            return Err(format!("{} tasks still Running after stop", running.len()).into());
        }

        info!("6. Remove the plan");
        cli.execute_cli_removeplan_cmd(&ms, ExpectOutcome::Positive).await?;
        Ok(())
    }
    .await;
    cleanup.run(&harness).await;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
async fn create_plan_on_converged_model_is_rejected() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();
    let cli = harness.cli();

    info!("1. Drop any leftover plan so create_plan sees the bare model");
    let _ = cli.execute_cli_removeplan_cmd(&ms, ExpectOutcome::Positive).await;

    info!("2. Attempt create_plan with no outstanding model changes");
    let rejection = cli.execute_cli_createplan_cmd(&ms, ExpectOutcome::Negative).await?;
    if !rejection.stderr_contains("DoNothingPlanError") {
        return Err(format!("unexpected create_plan rejection: {:?}", rejection.stderr).into());
    }
    if !rejection.stderr_contains("no tasks were generated") {
        return Err(format!("unexpected create_plan rejection: {:?}", rejection.stderr).into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn restore_model_discards_uncommitted_items() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();
    let cli = harness.cli();
    let model = harness.model();

    info!("1. Create an item but do not plan it");
    let software_col =
        model.find(&ms, "/software", "collection-of-software-item", false).await?;
    let url = format!("{}/restore_probe", software_col[0]);
    cli.execute_cli_create_cmd(
        &ms,
        &url,
        "package",
        &format!("name={TEST_PACKAGE}"),
        ExpectOutcome::Positive,
    )
    .await?;

    info!("2. Restore the model to its last applied state");
    cli.execute_cli_restoremodel_cmd(&ms, ExpectOutcome::Positive).await?;

    info!("3. Check the uncommitted item is gone");
    let rejection = cli.execute_cli_show_cmd(&ms, &url, "", ExpectOutcome::Negative).await?;
    if !is_text_in_list("InvalidLocationError", &rejection.stderr) {
        return Err(format!("expected InvalidLocationError, got {:?}", rejection.stderr).into());
    }
    Ok(())
}
