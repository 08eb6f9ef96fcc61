//! Gateway process guard and handoff.
//!
//! The bootstrap runs exactly once per container instance; the guard
//! checks the pid sidecar before any reconciliation work. The handoff
//! spawns the external long-lived gateway with a fixed argv derived only
//! from whether an auth token was supplied, then blocks until it exits.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::{Deserialize, Serialize};

use clawboot_core::paths::GATEWAY_PID_FILE;

use crate::error::{io_err, LauncherError};

/// Pid sidecar written next to the config document while the gateway runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PidFile {
    pub pid: u32,
}

impl PidFile {
    pub fn path(state_root: &Path) -> PathBuf {
        state_root.join(GATEWAY_PID_FILE)
    }

    /// Load the sidecar. Absent or malformed → `None` (a malformed pid
    /// file is just stale debris from a crash).
    pub fn load(state_root: &Path) -> Option<Self> {
        let raw = std::fs::read_to_string(Self::path(state_root)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self, state_root: &Path) -> Result<(), LauncherError> {
        let path = Self::path(state_root);
        let json = serde_json::to_string(self)?;
        std::fs::write(&path, format!("{json}\n")).map_err(|e| io_err(&path, e))?;
        Ok(())
    }
}

/// True when a previously started gateway is still alive.
pub fn gateway_running(state_root: &Path) -> bool {
    match PidFile::load(state_root) {
        Some(sidecar) => pid_alive(sidecar.pid),
        None => false,
    }
}

#[cfg(target_os = "linux")]
fn pid_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// Off Linux there is no /proc to consult; report not-running so the boot
// proceeds (the container targets are Linux).
#[cfg(not(target_os = "linux"))]
fn pid_alive(_pid: u32) -> bool {
    false
}

/// Fixed gateway argv. The only variation is the unauthenticated flag when
/// no token was supplied.
pub fn gateway_args(port: u16, token_supplied: bool) -> Vec<String> {
    let mut args = vec![
        "gateway".to_string(),
        "--port".to_string(),
        port.to_string(),
    ];
    if !token_supplied {
        args.push("--allow-unauthenticated".to_string());
    }
    args
}

/// Spawn the gateway, record its pid, and block until it exits. The pid
/// sidecar is removed again on a clean exit so the next boot's guard does
/// not probe a dead pid.
pub fn launch(
    state_root: &Path,
    bin: &Path,
    port: u16,
    token_supplied: bool,
) -> Result<ExitStatus, LauncherError> {
    let args = gateway_args(port, token_supplied);
    tracing::info!(bin = %bin.display(), ?args, "launching gateway");

    let mut child = Command::new(bin)
        .args(&args)
        .spawn()
        .map_err(|source| LauncherError::Spawn {
            bin: bin.to_path_buf(),
            source,
        })?;

    PidFile { pid: child.id() }.save(state_root)?;

    let status = child
        .wait()
        .map_err(|e| io_err(PidFile::path(state_root), e))?;
    let _ = std::fs::remove_file(PidFile::path(state_root));

    tracing::info!(%status, "gateway exited");
    Ok(status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn args_with_token_omit_unauthenticated_flag() {
        assert_eq!(gateway_args(18789, true), vec!["gateway", "--port", "18789"]);
    }

    #[test]
    fn args_without_token_allow_unauthenticated() {
        assert_eq!(
            gateway_args(18789, false),
            vec!["gateway", "--port", "18789", "--allow-unauthenticated"]
        );
    }

    #[test]
    fn no_pid_file_means_not_running() {
        let state = TempDir::new().expect("tempdir");
        assert!(!gateway_running(state.path()));
    }

    #[test]
    fn malformed_pid_file_means_not_running() {
        let state = TempDir::new().expect("tempdir");
        fs::write(state.path().join("gateway.pid"), "not json").expect("write");
        assert!(!gateway_running(state.path()));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn own_pid_counts_as_running() {
        let state = TempDir::new().expect("tempdir");
        PidFile {
            pid: std::process::id(),
        }
        .save(state.path())
        .expect("save");
        assert!(gateway_running(state.path()));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn dead_pid_counts_as_not_running() {
        let state = TempDir::new().expect("tempdir");
        // Far above any default pid_max.
        PidFile { pid: 3_999_999_99 }.save(state.path()).expect("save");
        assert!(!gateway_running(state.path()));
    }

    #[test]
    fn pid_file_roundtrip() {
        let state = TempDir::new().expect("tempdir");
        let sidecar = PidFile { pid: 42 };
        sidecar.save(state.path()).expect("save");
        assert_eq!(PidFile::load(state.path()), Some(sidecar));
    }

    #[test]
    #[cfg(unix)]
    fn launch_waits_and_cleans_up_pid_file() {
        let state = TempDir::new().expect("tempdir");
        let status = launch(state.path(), Path::new("true"), 18789, true).expect("launch");
        assert!(status.success());
        assert!(
            !PidFile::path(state.path()).exists(),
            "pid sidecar must be removed after a clean exit"
        );
    }

    #[test]
    fn launch_missing_binary_is_a_spawn_error() {
        let state = TempDir::new().expect("tempdir");
        let err = launch(
            state.path(),
            Path::new("/nonexistent/openclaw-gateway"),
            18789,
            true,
        )
        .expect_err("spawn should fail");
        assert!(matches!(err, LauncherError::Spawn { .. }));
    }
}
