// crates/litp-harness/src/model.rs
// ============================================================================
// Module: Model Tree Queries
// Description: Read access to the LITP model tree and item lifecycle states.
// Purpose: Provide find, get_item_state, and property lookup over the CLI.
// Dependencies: cli, exec, serde_json
// ============================================================================

//! ## Overview
//! The model tree lives on the MS; suites only read it. `litp show -r`
//! enumerates every item below a path as a block of the form:
//!
//! ```text
//! /software/items/vim
//!     type: package
//!     state: Initial
//! ```
//!
//! [`ModelReader::find`] scans those blocks by item type, the way the original
//! harness's `find` does. States compare exactly: while a removal plan runs an
//! item may report `ForRemoval (deconfiguration)`, which is distinct from
//! `ForRemoval`. Property maps come from the JSON form (`litp show -j`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use crate::cli::CliDriver;
use crate::cli::ExpectOutcome;
use crate::cluster::NodeHandle;
use crate::error::HarnessError;
use crate::exec::RemoteExecutor;

// ============================================================================
// SECTION: Item States
// ============================================================================

/// Canonical model item lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Created but never deployed.
    Initial,
    /// Deployed and matching the model.
    Applied,
    /// Applied but modified since the last plan.
    Updated,
    /// Marked for removal by the next plan.
    ForRemoval,
    /// Removed by a plan but still present in the tree.
    Removed,
}

impl ItemState {
    /// The exact string `litp show` prints for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Applied => "Applied",
            Self::Updated => "Updated",
            Self::ForRemoval => "ForRemoval",
            Self::Removed => "Removed",
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Show Output Parsing
// ============================================================================

/// One item block from recursive `litp show` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowItem {
    /// Model path of the item.
    pub path: String,
    /// Declared item type, verbatim (`package`, `reference-to-package`, ...).
    pub item_type: String,
    /// Lifecycle state, verbatim including any qualifier.
    pub state: String,
}

/// Parses recursive `litp show` output into item blocks.
#[must_use]
pub fn parse_show_items(lines: &[String]) -> Vec<ShowItem> {
    let mut items = Vec::new();
    let mut current: Option<ShowItem> = None;
    for line in lines {
        if line.starts_with('/') {
            if let Some(item) = current.take() {
                items.push(item);
            }
            current = Some(ShowItem {
                path: line.trim().to_string(),
                item_type: String::new(),
                state: String::new(),
            });
            continue;
        }
        let Some(item) = current.as_mut() else {
            continue;
        };
        let trimmed = line.trim();
        if let Some(value) = trimmed.strip_prefix("type:") {
            item.item_type = value.trim().to_string();
        } else if let Some(value) = trimmed.strip_prefix("state:") {
            item.state = value.trim().to_string();
        }
    }
    if let Some(item) = current {
        items.push(item);
    }
    items
}

fn type_matches(observed: &str, wanted: &str, exact_match: bool) -> bool {
    if observed == wanted {
        return true;
    }
    if exact_match {
        return false;
    }
    // Inherited items report as reference-to-<source type>.
    observed
        .strip_prefix("reference-to-")
        .is_some_and(|suffix| suffix == wanted)
}

// ============================================================================
// SECTION: Model Reader
// ============================================================================

/// Read-side driver over the model tree on the MS.
#[derive(Clone)]
pub struct ModelReader {
    cli: CliDriver,
}

impl ModelReader {
    /// Builds a reader over the given executor.
    #[must_use]
    pub fn new(exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            cli: CliDriver::new(exec),
        }
    }

    /// Finds model paths of a given item type below `root_path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the show command fails (for example the root
    /// path does not exist) or when nothing matches.
    pub async fn find(
        &self,
        node: &NodeHandle,
        root_path: &str,
        item_type: &str,
        exact_match: bool,
    ) -> Result<Vec<String>, HarnessError> {
        let result =
            self.cli.execute_cli_show_cmd(node, root_path, "-r", ExpectOutcome::Positive).await?;
        let paths: Vec<String> = parse_show_items(&result.stdout)
            .into_iter()
            .filter(|item| type_matches(&item.item_type, item_type, exact_match))
            .map(|item| item.path)
            .collect();
        if paths.is_empty() {
            return Err(HarnessError::NotFound(format!(
                "no {item_type} item below {root_path}"
            )));
        }
        Ok(paths)
    }

    /// Returns the verbatim state string of the item at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the show command fails or prints no state line.
    pub async fn get_item_state(
        &self,
        node: &NodeHandle,
        path: &str,
    ) -> Result<String, HarnessError> {
        let result =
            self.cli.execute_cli_show_cmd(node, path, "", ExpectOutcome::Positive).await?;
        let items = parse_show_items(&result.stdout);
        items
            .into_iter()
            .find(|item| !item.state.is_empty())
            .map(|item| item.state)
            .ok_or_else(|| HarnessError::parse(format!("show of {path}"), "no state line"))
    }

    /// Returns the property map of the item at `path` from `show -j` output.
    ///
    /// # Errors
    ///
    /// Returns an error when the show command fails or the JSON has no
    /// `properties` object.
    pub async fn get_props_from_url(
        &self,
        node: &NodeHandle,
        path: &str,
    ) -> Result<HashMap<String, String>, HarnessError> {
        let result =
            self.cli.execute_cli_show_cmd(node, path, "-j", ExpectOutcome::Positive).await?;
        let raw = result.stdout.join("\n");
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|err| HarnessError::parse(format!("show -j of {path}"), err.to_string()))?;
        let Some(props) = value.get("properties").and_then(serde_json::Value::as_object) else {
            return Err(HarnessError::parse(
                format!("show -j of {path}"),
                "missing properties object",
            ));
        };
        Ok(props
            .iter()
            .map(|(key, value)| {
                let rendered = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                (key.clone(), rendered)
            })
            .collect())
    }

    /// Returns one property of the item at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the property is absent or the lookup fails.
    pub async fn get_prop_from_url(
        &self,
        node: &NodeHandle,
        path: &str,
        prop: &str,
    ) -> Result<String, HarnessError> {
        let props = self.get_props_from_url(node, path).await?;
        props
            .get(prop)
            .cloned()
            .ok_or_else(|| HarnessError::NotFound(format!("property {prop} on {path}")))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
