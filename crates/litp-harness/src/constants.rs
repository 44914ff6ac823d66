// crates/litp-harness/src/constants.rs
// ============================================================================
// Module: Shared Constants
// Description: Literal paths and binaries on the deployment under test.
// Purpose: Keep remote path and tool literals in one place for all suites.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every suite builds remote commands from the same litpd file locations and
//! absolute tool paths. Collecting the literals here keeps test bodies free of
//! stringly path knowledge and makes platform drift a one-file fix.

// ============================================================================
// SECTION: litpd Files
// ============================================================================

/// Main litpd configuration file on the MS.
pub const LITPD_CONF_FILE: &str = "/etc/litpd.conf";
/// litpd process PID file.
pub const LITP_PID_FILE: &str = "/var/run/litp_service.py.pid";
/// Lock file present while litpd is starting up.
pub const STARTUP_LOCK_FILE: &str = "/var/run/litp_startup_lock";
/// litpd REST access log.
pub const LITPD_ACCESS_LOG: &str = "/var/log/litp/litpd_access.log";
/// litpd error log.
pub const LITPD_ERROR_LOG: &str = "/var/log/litp/litpd_error.log";
/// litpd metrics log.
pub const METRICS_LOG: &str = "/var/log/litp/metrics.log";
/// litp logging configuration model path.
pub const LITP_LOGGING_PATH: &str = "/litp/logging";
/// litp maintenance mode model path.
pub const LITP_MAINTENANCE_PATH: &str = "/litp/maintenance";

// ============================================================================
// SECTION: System Files
// ============================================================================

/// Combined system log all daemons write through syslog.
pub const GEN_SYSTEM_LOG_PATH: &str = "/var/log/messages";
/// Directory litpd writes generated Puppet manifests into.
pub const PUPPET_MANIFESTS_DIR: &str = "/opt/ericsson/nms/litp/etc/puppet/manifests/plugins/";
/// Puppet agent run lock; present while a catalog run is in progress.
pub const PUPPET_AGENT_LOCK_FILE: &str =
    "/var/lib/puppet/state/agent_catalog_run.lock";
/// Puppet agent configuration file.
pub const PUPPET_CONFIG_FILE: &str = "/etc/puppet/puppet.conf";

// ============================================================================
// SECTION: Tool Paths
// ============================================================================

/// Absolute path of `grep` on the nodes.
pub const GREP_PATH: &str = "/bin/grep";
/// Absolute path of `sed` on the nodes.
pub const SED_PATH: &str = "/bin/sed";
/// Absolute path of `awk` on the nodes.
pub const AWK_PATH: &str = "/bin/awk";
/// Absolute path of `ls` on the nodes.
pub const LS_PATH: &str = "/bin/ls";
/// Absolute path of `ps` on the nodes.
pub const PS_PATH: &str = "/bin/ps";
/// Absolute path of `stat` on the nodes.
pub const STAT_PATH: &str = "/usr/bin/stat";
/// Absolute path of `find` on the nodes.
pub const FIND_PATH: &str = "/bin/find";
/// Absolute path of `lsof` on the nodes.
pub const LSOF_PATH: &str = "/usr/sbin/lsof";
/// Absolute path of `mount` on the nodes.
pub const MOUNT_PATH: &str = "/bin/mount";
/// Absolute path of `umount` on the nodes.
pub const UMOUNT_PATH: &str = "/bin/umount";
/// Absolute path of `systemctl` on the nodes.
pub const SYSTEMCTL_PATH: &str = "/usr/bin/systemctl";
/// Absolute path of `curl` on the nodes.
pub const CURL_PATH: &str = "/usr/bin/curl";
/// Absolute path of the litp CLI on the MS.
pub const LITP_PATH: &str = "/usr/bin/litp";

// ============================================================================
// SECTION: REST Defaults
// ============================================================================

/// TCP port the litpd REST API listens on.
pub const LITPD_REST_PORT: u16 = 9999;
/// Versioned base path of the litpd REST API.
pub const LITPD_REST_BASE: &str = "/litp/rest/v1";
