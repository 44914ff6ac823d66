// crates/litp-harness/src/cluster.rs
// ============================================================================
// Module: Cluster Configuration
// Description: Node handles and connection data for the deployment under test.
// Purpose: Provide typed access to the MS and managed nodes from a TOML file.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! System tests target one management server (MS) plus the managed nodes it
//! deploys. The connection map is supplied by the operator as a TOML file and
//! named through the `LITP_SYSTEM_TEST_CONFIG` environment variable; nothing
//! about the deployment is hardcoded in test code.
//!
//! Example configuration:
//!
//! ```toml
//! [[node]]
//! filename = "ms1"
//! hostname = "ms1"
//! ipv4 = "192.168.0.42"
//! username = "litp-admin"
//! node_type = "management-server"
//!
//! [[node]]
//! filename = "node1"
//! hostname = "node1"
//! ipv4 = "192.168.0.43"
//! username = "litp-admin"
//! node_type = "managed-node"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Deserialize;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment variable naming the cluster configuration file.
pub const CLUSTER_CONFIG_ENV: &str = "LITP_SYSTEM_TEST_CONFIG";

// ============================================================================
// SECTION: Node Types
// ============================================================================

/// Role of a node within the deployment under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// The node running the litpd service; target of CLI and REST calls.
    ManagementServer,
    /// A peer node LITP deploys configuration onto.
    ManagedNode,
}

/// Connection data for one reachable node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeHandle {
    /// Short identifier used by test code (for example `ms1`, `node1`).
    pub filename: String,
    /// Hostname of the node.
    pub hostname: String,
    /// IPv4 address used for SSH and REST connections.
    pub ipv4: String,
    /// Account used for non-root command execution.
    pub username: String,
    /// Optional password; key-based SSH is assumed when absent.
    #[serde(default)]
    pub password: Option<String>,
    /// Role of the node.
    pub node_type: NodeType,
}

// ============================================================================
// SECTION: Cluster Configuration
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClusterConfigFile {
    #[serde(default, rename = "node")]
    nodes: Vec<NodeHandle>,
}

/// The full connection map for one deployment under test.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    ms: NodeHandle,
    managed: Vec<NodeHandle>,
}

impl ClusterConfig {
    /// Builds a config from pre-assembled node handles.
    ///
    /// # Errors
    ///
    /// Returns an error when the node list does not contain exactly one
    /// management server or when filenames collide.
    pub fn from_nodes(nodes: Vec<NodeHandle>) -> Result<Self, HarnessError> {
        let mut ms = None;
        let mut managed = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for node in nodes {
            if seen.iter().any(|name| *name == node.filename) {
                return Err(HarnessError::Config(format!(
                    "duplicate node filename: {}",
                    node.filename
                )));
            }
            seen.push(node.filename.clone());
            match node.node_type {
                NodeType::ManagementServer => {
                    if ms.is_some() {
                        return Err(HarnessError::Config(
                            "more than one management-server node defined".to_string(),
                        ));
                    }
                    ms = Some(node);
                }
                NodeType::ManagedNode => managed.push(node),
            }
        }
        let Some(ms) = ms else {
            return Err(HarnessError::Config(
                "no management-server node defined".to_string(),
            ));
        };
        Ok(Self {
            ms,
            managed,
        })
    }

    /// Loads a cluster configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, parsed, or validated.
    pub fn from_path(path: &Path) -> Result<Self, HarnessError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            HarnessError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        let parsed: ClusterConfigFile = toml::from_str(&raw).map_err(|err| {
            HarnessError::Config(format!("cannot parse {}: {err}", path.display()))
        })?;
        Self::from_nodes(parsed.nodes)
    }

    /// Loads the cluster configuration named by `LITP_SYSTEM_TEST_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is unset, not valid UTF-8, or the
    /// file it names fails to load.
    pub fn from_env() -> Result<Self, HarnessError> {
        let Some(raw) = std::env::var_os(CLUSTER_CONFIG_ENV) else {
            return Err(HarnessError::Config(format!(
                "{CLUSTER_CONFIG_ENV} is not set; system tests need a cluster config file"
            )));
        };
        let raw = raw.into_string().map_err(|_| {
            HarnessError::Config(format!("{CLUSTER_CONFIG_ENV} must be valid UTF-8"))
        })?;
        Self::from_path(Path::new(&raw))
    }

    /// Returns the management server handle.
    #[must_use]
    pub const fn management_node(&self) -> &NodeHandle {
        &self.ms
    }

    /// Returns the managed node handles in file order.
    #[must_use]
    pub fn managed_nodes(&self) -> &[NodeHandle] {
        &self.managed
    }

    /// Looks up a node by filename across the whole deployment.
    #[must_use]
    pub fn node(&self, filename: &str) -> Option<&NodeHandle> {
        if self.ms.filename == filename {
            return Some(&self.ms);
        }
        self.managed.iter().find(|node| node.filename == filename)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
