// system-tests/tests/suites/rest_api.rs
// ============================================================================
// Module: REST API Tests
// Description: litpd REST surface mirrors the CLI with HAL JSON semantics.
// Purpose: Pin status codes, HAL bodies and error messages of the REST API.
// Dependencies: helpers, litp-harness, serde_json
// ============================================================================

//! ## Overview
//! litpd exposes the model over HAL JSON; every CLI verb has a REST
//! equivalent. These scenarios assert the transport contract: 2xx statuses
//! with `_embedded` collections on success, 4xx statuses with a `messages`
//! array naming the error on rejection, and item lifecycle (create, read,
//! update, delete) driven purely over HTTP.

use std::error::Error;

use litp_harness::RestClient;
use serde_json::Value;
use serde_json::json;
use tracing::info;

use crate::helpers::fixture;

/// Extracts the error names from a HAL `messages` array.
fn error_types(body: &Value) -> Vec<String> {
    body.get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(|message| message.get("type"))
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn rest_client() -> Result<RestClient, Box<dyn Error>> {
    let harness = fixture::harness()?;
    Ok(harness.rest()?)
}

#[tokio::test(flavor = "multi_thread")]
async fn model_root_serves_hal_collections() -> Result<(), Box<dyn Error>> {
    let rest = rest_client()?;

    info!("1. GET the model root");
    let response = rest.get("/").await?;
    if response.status != 200 {
        return Err(format!("GET / returned {}", response.status).into());
    }
    let body = response.get_json_response()?;
    if body.get("_embedded").is_none() {
        return Err(format!("model root body has no _embedded: {}", response.body).into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_path_returns_not_found_message() -> Result<(), Box<dyn Error>> {
    let rest = rest_client()?;

    info!("1. GET a path the model does not contain");
    let response = rest.get("/no_such_root/items/missing").await?;
    if response.status != 404 {
        return Err(format!("expected 404, got {}", response.status).into());
    }
    let body = response.get_json_response()?;
    let errors = error_types(&body);
    if !errors.iter().any(|name| name == "InvalidLocationError") {
        return Err(format!("expected InvalidLocationError, got {errors:?}").into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn item_lifecycle_over_rest() -> Result<(), Box<dyn Error>> {
    let rest = rest_client()?;
    let outcome = async {
        let parent = "/software/items";
        let item_path = format!("{parent}/rest_probe");

        info!("1. Create a package item over REST");
        let created = rest
            .create_rest(parent, "rest_probe", "package", json!({ "name": "finger" }))
            .await?;
        if created.status != 201 {
            return Err(
                format!("create returned {}: {}", created.status, created.body).into()
            );
        }

        info!("2. Read it back and check it is Initial");
        let read = rest.get(&item_path).await?;
        if read.status != 200 {
            return Err(format!("read-back returned {}", read.status).into());
        }
        let body = read.get_json_response()?;
        let state = body.get("state").and_then(Value::as_str).unwrap_or_default();
        if state != "Initial" {
            return Err(format!("new item state is `{state}`, expected Initial").into());
        }

        info!("3. Update a property over REST");
        let updated =
            rest.update_rest(&item_path, json!({ "name": "finger", "epoch": "0" })).await?;
        if !updated.is_status_success() {
            return Err(
                format!("update returned {}: {}", updated.status, updated.body).into()
            );
        }

        info!("4. Delete it over REST");
        let deleted = rest.delete(&item_path).await?;
        if !deleted.is_status_success() {
            return Err(format!("delete returned {}", deleted.status).into());
        }
        let gone = rest.get(&item_path).await?;
        if gone.status != 404 {
            return Err(format!("deleted item still answers {}", gone.status).into());
        }
        Ok(())
    }
    .await;
    // The explicit delete also removes the registered cleanup path; a second
    // delete on a clean run is a logged 404, not a failure.
    rest.clean_paths().await;
    outcome
}

#[tokio::test(flavor = "multi_thread")]
async fn create_with_unknown_type_is_rejected_over_rest() -> Result<(), Box<dyn Error>> {
    let rest = rest_client()?;
    let outcome = async {
        info!("1. POST an item of an unregistered type");
        let response = rest
            .create_rest("/software/items", "bogus_rest_item", "no-such-item-type", json!({}))
            .await?;
        if response.is_status_success() {
            return Err(format!("create unexpectedly passed: {}", response.body).into());
        }
        let body = response.get_json_response()?;
        let errors = error_types(&body);
        if !errors.iter().any(|name| name == "InvalidTypeError") {
            return Err(format!("expected InvalidTypeError, got {errors:?}").into());
        }
        Ok(())
    }
    .await;
    rest.clean_paths().await;
    outcome
}
