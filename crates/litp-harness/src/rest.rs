// crates/litp-harness/src/rest.rs
// ============================================================================
// Module: REST Client
// Description: HTTP access to the litpd REST API with HAL JSON parsing.
// Purpose: Mirror the CLI verb surface over REST for API-level suites.
// Dependencies: reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! litpd serves a HAL-compliant JSON API at `https://<ms>:9999/litp/rest/v1`.
//! The certificate is self-signed, so verification is disabled for this
//! client. Responses are returned as `(body, status)` pairs; suites assert on
//! status codes and on the parsed HAL body (`_embedded` collections,
//! `messages` error arrays) separately.
//!
//! Paths registered through [`RestClient::register_cleanup_path`] are removed
//! in reverse order by [`RestClient::clean_paths`], which teardown calls
//! best-effort so a failed suite cannot leave model litter behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use tracing::info;
use tracing::warn;
use url::Url;

use crate::cluster::NodeHandle;
use crate::constants::LITPD_REST_BASE;
use crate::constants::LITPD_REST_PORT;
use crate::error::HarnessError;
use crate::plan::PlanState;
use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::poll::poll_until;

// ============================================================================
// SECTION: Response Type
// ============================================================================

/// One REST exchange: response body and HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    /// Raw response body.
    pub body: String,
    /// HTTP status code.
    pub status: u16,
}

impl RestResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_status_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the body when it is not valid JSON.
    pub fn get_json_response(&self) -> Result<Value, HarnessError> {
        serde_json::from_str(&self.body).map_err(|err| {
            HarnessError::parse(format!("rest body `{}`", self.body), err.to_string())
        })
    }
}

// ============================================================================
// SECTION: REST Client
// ============================================================================

/// Client for the litpd REST API.
pub struct RestClient {
    base: Url,
    client: reqwest::Client,
    cleanup_paths: Mutex<Vec<String>>,
}

impl RestClient {
    /// Builds a client against an explicit base URL (scheme included).
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(base: &str) -> Result<Self, HarnessError> {
        let base = Url::parse(base)
            .map_err(|err| HarnessError::Rest(format!("invalid base url {base}: {err}")))?;
        let client = reqwest::Client::builder()
            // litpd serves a self-signed certificate.
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| HarnessError::Rest(err.to_string()))?;
        Ok(Self {
            base,
            client,
            cleanup_paths: Mutex::new(Vec::new()),
        })
    }

    /// Builds a client for the MS node's default litpd endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the derived URL is invalid.
    pub fn for_node(ms: &NodeHandle) -> Result<Self, HarnessError> {
        Self::new(&format!("https://{}:{LITPD_REST_PORT}{LITPD_REST_BASE}", ms.ipv4))
    }

    fn endpoint(&self, model_path: &str) -> Result<Url, HarnessError> {
        let joined = format!("{}{model_path}", self.base.as_str().trim_end_matches('/'));
        Url::parse(&joined)
            .map_err(|err| HarnessError::Rest(format!("invalid path {model_path}: {err}")))
    }

    async fn request(
        &self,
        method: reqwest::Method,
        model_path: &str,
        body: Option<Value>,
    ) -> Result<RestResponse, HarnessError> {
        let url = self.endpoint(model_path)?;
        info!(%method, %url, "litp rest");
        let mut request =
            self.client.request(method, url).header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response =
            request.send().await.map_err(|err| HarnessError::Rest(err.to_string()))?;
        let status = response.status().as_u16();
        let body =
            response.text().await.map_err(|err| HarnessError::Rest(err.to_string()))?;
        Ok(RestResponse {
            body,
            status,
        })
    }

    /// GET of a model path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn get(&self, model_path: &str) -> Result<RestResponse, HarnessError> {
        self.request(reqwest::Method::GET, model_path, None).await
    }

    /// POST of a JSON body under a model path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn post(
        &self,
        model_path: &str,
        body: Value,
    ) -> Result<RestResponse, HarnessError> {
        self.request(reqwest::Method::POST, model_path, Some(body)).await
    }

    /// PUT of a JSON body at a model path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn put(
        &self,
        model_path: &str,
        body: Value,
    ) -> Result<RestResponse, HarnessError> {
        self.request(reqwest::Method::PUT, model_path, Some(body)).await
    }

    /// DELETE of a model path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn delete(&self, model_path: &str) -> Result<RestResponse, HarnessError> {
        self.request(reqwest::Method::DELETE, model_path, None).await
    }

    // ------------------------------------------------------------------
    // Model verbs
    // ------------------------------------------------------------------

    /// Creates a model item over REST; the new path is registered for
    /// teardown cleanup.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn create_rest(
        &self,
        parent_path: &str,
        item_id: &str,
        item_type: &str,
        properties: Value,
    ) -> Result<RestResponse, HarnessError> {
        let body = json!({
            "id": item_id,
            "type": item_type,
            "properties": properties,
        });
        let response = self.post(parent_path, body).await?;
        if response.is_status_success() {
            self.register_cleanup_path(&format!("{parent_path}/{item_id}"));
        }
        Ok(response)
    }

    /// Updates item properties over REST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn update_rest(
        &self,
        model_path: &str,
        properties: Value,
    ) -> Result<RestResponse, HarnessError> {
        self.put(model_path, json!({ "properties": properties })).await
    }

    /// Inherits a source item onto a destination path over REST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn inherit_cmd_rest(
        &self,
        parent_path: &str,
        item_id: &str,
        source_path: &str,
    ) -> Result<RestResponse, HarnessError> {
        let body = json!({
            "id": item_id,
            "inherit": source_path,
        });
        let response = self.post(parent_path, body).await?;
        if response.is_status_success() {
            self.register_cleanup_path(&format!("{parent_path}/{item_id}"));
        }
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Plan verbs
    // ------------------------------------------------------------------

    /// Creates a plan over REST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn create_plan_rest(&self) -> Result<RestResponse, HarnessError> {
        self.post("/plans", json!({ "id": "plan", "type": "plan" })).await
    }

    /// Starts the plan over REST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn run_plan_rest(&self) -> Result<RestResponse, HarnessError> {
        self.update_rest("/plans/plan", json!({ "state": "running" })).await
    }

    /// Stops the plan over REST.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn stop_plan_rest(&self) -> Result<RestResponse, HarnessError> {
        self.update_rest("/plans/plan", json!({ "state": "stopped" })).await
    }

    /// Polls the plan resource until its state property reaches `state`;
    /// `Ok(false)` on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a malformed plan resource.
    pub async fn wait_for_plan_state_rest(
        &self,
        state: PlanState,
        timeout: Duration,
    ) -> Result<bool, HarnessError> {
        let wanted = state.as_str().to_ascii_lowercase();
        poll_until(timeout, DEFAULT_POLL_INTERVAL, || {
            let wanted = wanted.clone();
            async move {
                let response = self.get("/plans/plan").await?;
                if !response.is_status_success() {
                    return Ok(false);
                }
                let body = response.get_json_response()?;
                let observed = body
                    .get("properties")
                    .and_then(|props| props.get("state"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Ok(observed == wanted)
            }
        })
        .await
    }

    // ------------------------------------------------------------------
    // Teardown support
    // ------------------------------------------------------------------

    /// Registers a model path for teardown removal.
    pub fn register_cleanup_path(&self, model_path: &str) {
        if let Ok(mut paths) = self.cleanup_paths.lock() {
            paths.push(model_path.to_string());
        }
    }

    /// Deletes every registered path in reverse order, best-effort.
    ///
    /// Failures are logged and skipped; teardown must visit every path.
    pub async fn clean_paths(&self) {
        let paths = match self.cleanup_paths.lock() {
            Ok(mut paths) => std::mem::take(&mut *paths),
            Err(_) => return,
        };
        for path in paths.iter().rev() {
            match self.delete(path).await {
                Ok(response) if response.is_status_success() => {}
                Ok(response) => {
                    warn!(%path, status = response.status, "cleanup delete rejected");
                }
                Err(err) => warn!(%path, %err, "cleanup delete failed"),
            }
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
