// crates/litp-harness/src/fs.rs
// ============================================================================
// Module: Remote File Inspection
// Description: File reads, probes, and backup/restore on cluster nodes.
// Purpose: Support log assertions and config-file isolation between tests.
// Dependencies: exec, tracing
// ============================================================================

//! ## Overview
//! Log and manifest assertions read remote files through the executor; config
//! mutations go through [`FileBackup`] so teardown can put the node back the
//! way the test found it. Backups are plain `cp -p` copies next to the
//! original, restore is a move back; both run as root.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::cluster::NodeHandle;
use crate::error::HarnessError;
use crate::exec::CommandResult;
use crate::exec::RemoteExecutor;
use crate::exec::RunOptions;
use crate::exec::shell_quote;

// ============================================================================
// SECTION: File Driver
// ============================================================================

/// Remote file operations over the executor.
#[derive(Clone)]
pub struct FileDriver {
    exec: Arc<dyn RemoteExecutor>,
}

impl FileDriver {
    /// Builds a driver over the given executor.
    #[must_use]
    pub fn new(exec: Arc<dyn RemoteExecutor>) -> Self {
        Self {
            exec,
        }
    }

    async fn run_root(
        &self,
        node: &NodeHandle,
        cmd: &str,
    ) -> Result<CommandResult, HarnessError> {
        self.exec.run(node, cmd, &RunOptions::as_root()).await
    }

    /// True when `path` exists on the node.
    ///
    /// # Errors
    ///
    /// Returns an error only when the probe command cannot run.
    pub async fn path_exists(
        &self,
        node: &NodeHandle,
        path: &str,
    ) -> Result<bool, HarnessError> {
        let result = self.run_root(node, &format!("test -e {path}")).await?;
        Ok(result.rc == 0)
    }

    /// Reads a remote file as lines.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub async fn get_file_contents(
        &self,
        node: &NodeHandle,
        path: &str,
    ) -> Result<Vec<String>, HarnessError> {
        let result = self.run_root(node, &format!("cat {path}")).await?;
        if result.rc != 0 {
            return Err(HarnessError::Expectation {
                node: node.filename.clone(),
                cmd: format!("cat {path}"),
                rc: result.rc,
                stderr: result.stderr,
            });
        }
        Ok(result.stdout)
    }

    /// Line count of a remote file; used to anchor log waits at the current
    /// end of file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub async fn file_len(&self, node: &NodeHandle, path: &str) -> Result<usize, HarnessError> {
        let result = self.run_root(node, &format!("wc -l < {path}")).await?;
        if result.rc != 0 {
            return Err(HarnessError::Expectation {
                node: node.filename.clone(),
                cmd: format!("wc -l < {path}"),
                rc: result.rc,
                stderr: result.stderr,
            });
        }
        let raw = result.stdout.first().map(|line| line.trim()).unwrap_or_default();
        raw.parse().map_err(|_| {
            HarnessError::parse(format!("wc -l of {path}"), format!("bad count `{raw}`"))
        })
    }

    /// Writes `content` to a remote file, replacing what was there.
    ///
    /// Pair with [`FileBackup`] when the file must survive the test.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub async fn write_file(
        &self,
        node: &NodeHandle,
        path: &str,
        content: &str,
    ) -> Result<(), HarnessError> {
        let cmd = format!("printf '%s' {} > {path}", shell_quote(content));
        let result = self.run_root(node, &cmd).await?;
        if result.rc == 0 {
            return Ok(());
        }
        Err(HarnessError::Expectation {
            node: node.filename.clone(),
            cmd: format!("write {path}"),
            rc: result.rc,
            stderr: result.stderr,
        })
    }

    /// Creates a directory (and parents) on the node.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub async fn create_dir(&self, node: &NodeHandle, path: &str) -> Result<(), HarnessError> {
        let result = self.run_root(node, &format!("mkdir -p {path}")).await?;
        if result.rc == 0 {
            return Ok(());
        }
        Err(HarnessError::Expectation {
            node: node.filename.clone(),
            cmd: format!("mkdir -p {path}"),
            rc: result.rc,
            stderr: result.stderr,
        })
    }
}

// ============================================================================
// SECTION: File Backup
// ============================================================================

/// A remote file copied aside for the duration of a test.
pub struct FileBackup {
    driver: FileDriver,
    node: NodeHandle,
    path: String,
    backup_path: String,
    restored: bool,
}

impl FileBackup {
    /// Copies `path` aside on `node`.
    ///
    /// # Errors
    ///
    /// Returns an error when the copy fails.
    pub async fn acquire(
        driver: &FileDriver,
        node: &NodeHandle,
        path: &str,
    ) -> Result<Self, HarnessError> {
        let backup_path = format!("{path}.littest.bak");
        info!(node = %node.filename, %path, "backing up file");
        let result =
            driver.run_root(node, &format!("cp -p {path} {backup_path}")).await?;
        if result.rc != 0 {
            return Err(HarnessError::Expectation {
                node: node.filename.clone(),
                cmd: format!("cp -p {path} {backup_path}"),
                rc: result.rc,
                stderr: result.stderr,
            });
        }
        Ok(Self {
            driver: driver.clone(),
            node: node.clone(),
            path: path.to_string(),
            backup_path,
            restored: false,
        })
    }

    /// Moves the backup copy back over the original.
    ///
    /// Safe to call more than once; later calls are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error when the restore command fails.
    pub async fn restore(&mut self) -> Result<(), HarnessError> {
        if self.restored {
            return Ok(());
        }
        info!(node = %self.node.filename, path = %self.path, "restoring file");
        let cmd = format!("mv -f {} {}", self.backup_path, self.path);
        let result = self.driver.run_root(&self.node, &cmd).await?;
        if result.rc != 0 {
            warn!(node = %self.node.filename, path = %self.path, "restore failed");
            return Err(HarnessError::Expectation {
                node: self.node.filename.clone(),
                cmd,
                rc: result.rc,
                stderr: result.stderr,
            });
        }
        self.restored = true;
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
