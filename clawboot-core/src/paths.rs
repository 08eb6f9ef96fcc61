//! Well-known paths for the bootstrap.
//!
//! # On-disk layout
//!
//! ```text
//! {backup}/                       remote backup mount (read-only input)
//!   .last-sync                    sync marker written by the backup producer
//!   openclaw/openclaw.json        config, current layout
//!   clawdbot/clawdbot.json        config, legacy nested layout
//!   clawdbot.json                 config, legacy flat layout
//!   openclaw-workspace[/workspace]
//!   workspace[/workspace]
//!   openclaw-skills | skills
//!
//! {state}/                        local state root (~/.openclaw)
//!   .last-sync
//!   openclaw.json
//!   workspace/                    agent-visible workspace
//!   skills/
//!   gateway.pid, *.lock
//! ```
//!
//! # API pattern
//!
//! [`BootRoots::resolve`] reads the environment once at startup; every
//! other function is pure and takes explicit roots. Tests must NEVER call
//! `resolve()` — construct `BootRoots` directly over `TempDir`s.

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Marker filename at each tree root.
pub const MARKER_FILE: &str = ".last-sync";

/// Canonical configuration document filename.
pub const CONFIG_FILE: &str = "openclaw.json";
/// Configuration filename written by pre-rename producers.
pub const LEGACY_CONFIG_FILE: &str = "clawdbot.json";

/// Backup subdirectory holding config in the current layout.
pub const CONFIG_BACKUP_CURRENT: &str = "openclaw";
/// Backup subdirectory holding config in the legacy nested layout.
pub const CONFIG_BACKUP_LEGACY: &str = "clawdbot";

/// Workspace backup roots, in precedence order.
pub const WORKSPACE_BACKUP_CURRENT: &str = "openclaw-workspace";
pub const WORKSPACE_BACKUP_LEGACY: &str = "workspace";
/// Subdirectory whose presence marks a complete workspace tree.
pub const WORKSPACE_MARKER_DIR: &str = "memory";

/// Skills backup roots, in precedence order.
pub const SKILLS_BACKUP_CURRENT: &str = "openclaw-skills";
pub const SKILLS_BACKUP_LEGACY: &str = "skills";

/// Local directory names under the state root.
pub const WORKSPACE_DIR: &str = "workspace";
pub const SKILLS_DIR: &str = "skills";

pub const GATEWAY_PID_FILE: &str = "gateway.pid";
pub const DEFAULT_GATEWAY_BIN: &str = "openclaw-gateway";

const DEFAULT_BACKUP_ROOT: &str = "/backup";
const DEFAULT_TOOL_WORKSPACE: &str = "/workspace";
const STATE_DIR_NAME: &str = ".openclaw";

// ---------------------------------------------------------------------------
// BootRoots
// ---------------------------------------------------------------------------

/// The three tree roots the bootstrap operates on, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootRoots {
    /// Remote backup mount (read-only input).
    pub backup: PathBuf,
    /// Local state root; holds config, markers, the agent-visible workspace.
    pub state: PathBuf,
    /// Tool-visible mirror of the workspace tree.
    pub tool_workspace: PathBuf,
}

impl BootRoots {
    /// Resolve roots from `CLAWBOOT_BACKUP_ROOT`, `CLAWBOOT_STATE_DIR`, and
    /// `CLAWBOOT_TOOL_WORKSPACE`, defaulting to `/backup`, `~/.openclaw`,
    /// and `/workspace`.
    pub fn resolve() -> Result<Self, CoreError> {
        let backup = env_path("CLAWBOOT_BACKUP_ROOT")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_ROOT));
        let state = match env_path("CLAWBOOT_STATE_DIR") {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or(CoreError::HomeNotFound)?
                .join(STATE_DIR_NAME),
        };
        let tool_workspace = env_path("CLAWBOOT_TOOL_WORKSPACE")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL_WORKSPACE));
        Ok(Self {
            backup,
            state,
            tool_workspace,
        })
    }

    /// `{backup}/.last-sync` — marker written by the backup producer.
    pub fn backup_marker(&self) -> PathBuf {
        self.backup.join(MARKER_FILE)
    }

    /// `{state}/.last-sync` — local marker, refreshed after each restore.
    pub fn state_marker(&self) -> PathBuf {
        self.state.join(MARKER_FILE)
    }

    /// `{state}/openclaw.json` — the canonical configuration document.
    pub fn config_path(&self) -> PathBuf {
        self.state.join(CONFIG_FILE)
    }

    /// `{state}/clawdbot.json` — pre-rename location, migrated after restore.
    pub fn legacy_config_path(&self) -> PathBuf {
        self.state.join(LEGACY_CONFIG_FILE)
    }

    /// `{state}/workspace` — agent-visible workspace tree.
    pub fn agent_workspace(&self) -> PathBuf {
        self.state.join(WORKSPACE_DIR)
    }

    /// `{state}/skills` — local skills tree.
    pub fn skills_dir(&self) -> PathBuf {
        self.state.join(SKILLS_DIR)
    }

    /// `{state}/gateway.pid`.
    pub fn gateway_pid_path(&self) -> PathBuf {
        self.state.join(GATEWAY_PID_FILE)
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Gateway binary name: `$CLAWBOOT_GATEWAY_BIN` or `openclaw-gateway`.
pub fn gateway_bin() -> PathBuf {
    env_path("CLAWBOOT_GATEWAY_BIN").unwrap_or_else(|| PathBuf::from(DEFAULT_GATEWAY_BIN))
}

// ---------------------------------------------------------------------------
// Directory probes
// ---------------------------------------------------------------------------

/// True when `path` is a directory containing at least one entry.
///
/// Missing or unreadable directories count as empty: absence of backup
/// data is a legitimate state here, never an error.
pub fn dir_is_populated(path: &Path) -> bool {
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}

/// True when `path` is missing, not a directory, or has no entries.
pub fn dir_is_empty(path: &Path) -> bool {
    !dir_is_populated(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
