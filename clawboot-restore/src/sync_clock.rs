//! Marker comparison — the restore-vs-skip clock.
//!
//! Decision precedence over the two `.last-sync` markers:
//! 1. Both absent → `Restore` (bootstrap pull)
//! 2. Remote absent, local present → `Skip`
//! 3. Remote present, local absent → `Restore`
//! 4. Both present → `Restore` iff remote epoch is strictly greater;
//!    ties favor `Skip` (local wins on equality)
//!
//! Branch 1 is deliberately asymmetric: the remote store may be populated
//! by a producer that never wrote a marker, and losing that data on first
//! boot is worse than an unnecessary restore.

use std::path::Path;

use chrono::DateTime;

use clawboot_core::RestoreDecision;

use crate::error::{io_err, RestoreError};

/// Read a marker file's contents, trimmed. Absent file → `None`.
///
/// Unreadable markers also count as absent: a marker we cannot read tells
/// us nothing about sync state, and this phase never refuses to boot.
pub fn read_marker(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Some(raw.trim().to_string()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "marker unreadable, treating as absent");
            None
        }
    }
}

/// Parse a marker value into epoch seconds.
///
/// Accepts RFC 3339 (current producers) and bare Unix seconds (historical
/// producers). Anything else coerces to 0, the smallest trusted instant;
/// malformed markers are never raised to the caller.
pub fn parse_epoch(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return stamp.timestamp();
    }
    trimmed.parse::<i64>().unwrap_or(0)
}

/// Compare marker *contents* and decide restore-vs-skip.
pub fn compare(remote: Option<&str>, local: Option<&str>) -> RestoreDecision {
    match (remote, local) {
        (None, None) => bootstrap_pull(),
        (None, Some(_)) => keep_untracked_local(),
        (Some(_), None) => adopt_tracked_remote(),
        (Some(remote), Some(local)) => newer_remote_wins(remote, local),
    }
}

/// Read both marker files and decide. Convenience over [`compare`].
pub fn compare_paths(remote_marker: &Path, local_marker: &Path) -> RestoreDecision {
    let remote = read_marker(remote_marker);
    let local = read_marker(local_marker);
    compare(remote.as_deref(), local.as_deref())
}

/// Branch 1: neither side has ever synced. Pull once anyway; an untracked
/// remote tree may still hold data from a markerless producer.
fn bootstrap_pull() -> RestoreDecision {
    RestoreDecision::Restore
}

/// Branch 2: local has synced before, remote carries no marker. The local
/// copy is the only tracked state; leave it alone.
fn keep_untracked_local() -> RestoreDecision {
    RestoreDecision::Skip
}

/// Branch 3: remote is tracked, local never synced.
fn adopt_tracked_remote() -> RestoreDecision {
    RestoreDecision::Restore
}

/// Branch 4: both tracked. Strictly-newer remote wins; on a tie the local
/// copy wins, avoiding a needless overwrite of freshly-written state.
fn newer_remote_wins(remote: &str, local: &str) -> RestoreDecision {
    if parse_epoch(remote) > parse_epoch(local) {
        RestoreDecision::Restore
    } else {
        RestoreDecision::Skip
    }
}

/// Copy the remote marker to the local marker path after a successful
/// restore, so subsequent boots see consistent state. No remote marker →
/// no-op.
pub fn propagate(remote_marker: &Path, local_marker: &Path) -> Result<(), RestoreError> {
    let Some(value) = read_marker(remote_marker) else {
        return Ok(());
    };
    if let Some(parent) = local_marker.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(local_marker, format!("{value}\n")).map_err(|e| io_err(local_marker, e))?;
    tracing::debug!(marker = %value, path = %local_marker.display(), "propagated sync marker");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
