// system-tests/tests/suites/cli_validation.rs
// ============================================================================
// Module: CLI Validation Tests
// Description: Invalid CLI requests are rejected with the documented errors.
// Purpose: Pin the error names and rc contract of the litp CLI.
// Dependencies: helpers, litp-harness
// ============================================================================

//! ## Overview
//! Rejected CLI verbs must exit non-zero with nothing on stdout and the
//! documented error name on stderr. These scenarios cover the validation
//! paths a misbehaving caller hits first: unknown item types, nonexistent
//! model paths and plan verbs issued without a plan.

use std::error::Error;

use litp_harness::CommandResult;
use litp_harness::ExpectOutcome;
use tracing::info;

use crate::helpers::fixture;

fn require_stderr(
    result: &CommandResult,
    needle: &str,
) -> Result<(), Box<dyn Error>> {
    if !result.stderr_contains(needle) {
        return Err(format!("expected `{needle}` on stderr, got {:?}", result.stderr).into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_with_unknown_item_type_is_rejected() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();

    info!("1. Create an item of a type no model extension registers");
    let rejection = harness
        .cli()
        .execute_cli_create_cmd(
            &ms,
            "/software/items/bogus_type_item",
            "no-such-item-type",
            "name=ignored",
            ExpectOutcome::Negative,
        )
        .await?;
    require_stderr(&rejection, "InvalidTypeError")
}

#[tokio::test(flavor = "multi_thread")]
async fn create_under_nonexistent_parent_is_rejected() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();

    info!("1. Create an item under a path the model does not contain");
    let rejection = harness
        .cli()
        .execute_cli_create_cmd(
            &ms,
            "/no_such_root/items/orphan",
            "package",
            "name=finger",
            ExpectOutcome::Negative,
        )
        .await?;
    require_stderr(&rejection, "InvalidLocationError")?;
    require_stderr(&rejection, "Path not found")
}

#[tokio::test(flavor = "multi_thread")]
async fn remove_of_nonexistent_item_is_rejected() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();

    info!("1. Remove a path that was never created");
    let rejection = harness
        .cli()
        .execute_cli_remove_cmd(&ms, "/software/items/never_created", ExpectOutcome::Negative)
        .await?;
    require_stderr(&rejection, "InvalidLocationError")?;
    require_stderr(&rejection, "Path not found")
}

#[tokio::test(flavor = "multi_thread")]
async fn show_plan_without_a_plan_is_rejected() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();
    let cli = harness.cli();

    info!("1. Drop any leftover plan");
    let _ = cli.execute_cli_removeplan_cmd(&ms, ExpectOutcome::Positive).await;

    info!("2. show_plan with no plan present");
    let rejection = cli.execute_cli_showplan_cmd(&ms, "", ExpectOutcome::Negative).await?;
    require_stderr(&rejection, "InvalidLocationError")?;
    require_stderr(&rejection, "Plan does not exist")
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_plan_without_a_running_plan_is_rejected() -> Result<(), Box<dyn Error>> {
    let harness = fixture::harness()?;
    let ms = harness.management_node().clone();
    let cli = harness.cli();

    info!("1. Drop any leftover plan");
    let _ = cli.execute_cli_removeplan_cmd(&ms, ExpectOutcome::Positive).await;

    info!("2. stop_plan with nothing running");
    let rejection = cli.execute_cli_stopplan_cmd(&ms, ExpectOutcome::Negative).await?;
    require_stderr(&rejection, "InvalidRequestError")
}
