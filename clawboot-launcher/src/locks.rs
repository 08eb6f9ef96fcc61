//! Stale lock cleanup.
//!
//! A crashed gateway leaves its pid sidecar and `*.lock` files behind; a
//! leftover lock wedges the next start permanently. Cleanup runs
//! unconditionally right before launch; by that point the running-gateway
//! guard has already established that nothing owns them.

use std::path::{Path, PathBuf};

use clawboot_core::paths::GATEWAY_PID_FILE;

/// Remove the pid sidecar and any top-level `*.lock` files under the state
/// root. Returns the paths that were removed. Removal failures are logged
/// and skipped; cleanup is best-effort, never boot-fatal.
pub fn clear_stale_locks(state_root: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();

    let pid_file = state_root.join(GATEWAY_PID_FILE);
    if pid_file.exists() {
        remove(&pid_file, &mut removed);
    }

    let entries = match std::fs::read_dir(state_root) {
        Ok(entries) => entries,
        Err(_) => return removed,
    };
    let mut locks: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("lock"))
                    .unwrap_or(false)
        })
        .collect();
    locks.sort();

    for lock in locks {
        remove(&lock, &mut removed);
    }
    removed
}

fn remove(path: &Path, removed: &mut Vec<PathBuf>) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "removed stale lock from a previous run");
            removed.push(path.to_path_buf());
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not remove stale lock");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
