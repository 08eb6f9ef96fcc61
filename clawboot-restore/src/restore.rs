//! Per-category restoration.
//!
//! Policy, identical shape for every category:
//! 1. No backup at any known layout → skip (missing-input, not an error)
//! 2. Local destination missing or empty → unconditional restore
//!    (bootstrap case), regardless of the clock
//! 3. Otherwise → consult the sync clock; restore only on `Restore`
//!
//! A restore is a full recursive overwrite-copy (additive, never
//! mirror-delete). Config restores additionally migrate the legacy
//! filename, and every successful restore propagates the remote marker so
//! subsequent boots see consistent state.

use std::path::PathBuf;

use serde::Serialize;

use clawboot_core::paths::{
    MARKER_FILE, SKILLS_BACKUP_CURRENT, SKILLS_BACKUP_LEGACY, WORKSPACE_BACKUP_CURRENT,
    WORKSPACE_BACKUP_LEGACY,
};
use clawboot_core::{paths, BackupLayout, BootRoots, Category, RestoreDecision};

use crate::error::{io_err, RestoreError};
use crate::layout::ResolvedBackup;
use crate::{copy, sync_clock};

/// Top-level backup entries excluded when the flat legacy layout makes the
/// backup root itself the config source: sibling categories and the marker.
const FLAT_CONFIG_EXCLUDES: &[&str] = &[
    WORKSPACE_BACKUP_CURRENT,
    WORKSPACE_BACKUP_LEGACY,
    SKILLS_BACKUP_CURRENT,
    SKILLS_BACKUP_LEGACY,
    MARKER_FILE,
];

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Outcome of one category's restoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "result")]
pub enum RestoreOutcome {
    /// Backup data was copied into the local destination.
    Restored { source: PathBuf, files: u64 },
    /// Dry-run: a restore *would* have happened.
    WouldRestore { source: PathBuf },
    /// Nothing to do; `reason` says why.
    Skipped { reason: String },
    /// The copy failed; only this category is affected.
    Failed { error: String },
}

/// Why a category would (or would not) restore — shared by the live
/// restorer and the dry-run plan so both report the same verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// No backup present at any known layout.
    NoBackup,
    /// Local destination missing or empty; restore without consulting
    /// markers.
    Bootstrap,
    /// Marker comparison decides.
    Clock(RestoreDecision),
}

impl Verdict {
    pub fn decision(self) -> RestoreDecision {
        match self {
            Verdict::NoBackup => RestoreDecision::Skip,
            Verdict::Bootstrap => RestoreDecision::Restore,
            Verdict::Clock(decision) => decision,
        }
    }
}

/// Local destination tree for a category.
pub fn destination(roots: &BootRoots, category: Category) -> PathBuf {
    match category {
        Category::Config => roots.state.clone(),
        Category::Workspace => roots.agent_workspace(),
        Category::Skills => roots.skills_dir(),
    }
}

/// Compute the verdict for a category without touching the filesystem
/// beyond read-only probes.
pub fn decide(roots: &BootRoots, category: Category, resolved: &ResolvedBackup) -> Verdict {
    if resolved.source.is_none() {
        return Verdict::NoBackup;
    }
    if local_is_unpopulated(roots, category) {
        return Verdict::Bootstrap;
    }
    Verdict::Clock(sync_clock::compare_paths(
        &roots.backup_marker(),
        &roots.state_marker(),
    ))
}

/// Bootstrap probe. Config is present iff a config document exists under
/// either name — the state root also holds workspace/skills trees, so raw
/// directory emptiness would mask a missing document.
fn local_is_unpopulated(roots: &BootRoots, category: Category) -> bool {
    match category {
        Category::Config => {
            !roots.config_path().is_file() && !roots.legacy_config_path().is_file()
        }
        Category::Workspace | Category::Skills => {
            paths::dir_is_empty(&destination(roots, category))
        }
    }
}

/// Restore one category if the verdict calls for it. Idempotent;
/// side-effects only the local filesystem.
pub fn restore_if_needed(
    roots: &BootRoots,
    category: Category,
    resolved: &ResolvedBackup,
    dry_run: bool,
) -> Result<RestoreOutcome, RestoreError> {
    let verdict = decide(roots, category, resolved);
    let source = match (&resolved.source, verdict.decision()) {
        (None, _) => {
            tracing::info!(%category, "no backup data at any known layout");
            return Ok(RestoreOutcome::Skipped {
                reason: "no backup data".to_string(),
            });
        }
        (Some(_), RestoreDecision::Skip) => {
            tracing::info!(%category, "local copy is current, skipping restore");
            return Ok(RestoreOutcome::Skipped {
                reason: "local copy is current".to_string(),
            });
        }
        (Some(source), RestoreDecision::Restore) => source.clone(),
    };

    if dry_run {
        tracing::info!(%category, source = %source.display(), "[dry-run] would restore");
        return Ok(RestoreOutcome::WouldRestore { source });
    }

    let dest = destination(roots, category);
    let files = match (category, resolved.layout) {
        (Category::Config, BackupLayout::LegacyFlat) => {
            copy::copy_tree_filtered(&source, &dest, FLAT_CONFIG_EXCLUDES)?
        }
        _ => copy::copy_tree(&source, &dest)?,
    };

    if category == Category::Config {
        migrate_legacy_config_name(roots)?;
    }

    sync_clock::propagate(&roots.backup_marker(), &roots.state_marker())?;

    tracing::info!(
        %category,
        layout = %resolved.layout,
        source = %source.display(),
        files,
        "restored from backup",
    );
    Ok(RestoreOutcome::Restored { source, files })
}

/// Post-copy filename migration: `clawdbot.json` → `openclaw.json`, only
/// when the canonical name is not already taken.
fn migrate_legacy_config_name(roots: &BootRoots) -> Result<(), RestoreError> {
    let legacy = roots.legacy_config_path();
    let canonical = roots.config_path();
    if legacy.is_file() && !canonical.exists() {
        std::fs::rename(&legacy, &canonical).map_err(|e| io_err(&legacy, e))?;
        tracing::info!(
            from = %legacy.display(),
            to = %canonical.display(),
            "migrated legacy config filename",
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::layout;

    fn roots_over(tmp: &TempDir) -> BootRoots {
        BootRoots {
            backup: tmp.path().join("backup"),
            state: tmp.path().join("state"),
            tool_workspace: tmp.path().join("tool-ws"),
        }
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write");
    }

    fn restore(
        roots: &BootRoots,
        category: Category,
        dry_run: bool,
    ) -> RestoreOutcome {
        let resolved = layout::resolve(&roots.backup, category);
        restore_if_needed(roots, category, &resolved, dry_run).expect("restore")
    }

    #[test]
    fn absent_backup_skips_with_reason() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        let outcome = restore(&roots, Category::Workspace, false);
        assert_eq!(
            outcome,
            RestoreOutcome::Skipped {
                reason: "no backup data".to_string()
            }
        );
    }

    #[test]
    fn bootstrap_restores_without_any_markers() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "hello");

        let outcome = restore(&roots, Category::Workspace, false);
        assert!(matches!(outcome, RestoreOutcome::Restored { files: 1, .. }));
        assert_eq!(
            fs::read_to_string(roots.agent_workspace().join("memory/notes.md"))
                .expect("read"),
            "hello"
        );
    }

    #[test]
    fn restore_propagates_remote_marker() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "hello");
        write(&roots.backup, ".last-sync", "2024-01-01T00:00:00Z\n");

        restore(&roots, Category::Workspace, false);
        assert_eq!(
            sync_clock::read_marker(&roots.state_marker()).as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn second_run_is_idempotent_when_local_not_older() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "hello");
        write(&roots.backup, ".last-sync", "2024-01-01T00:00:00Z");

        let first = restore(&roots, Category::Workspace, false);
        assert!(matches!(first, RestoreOutcome::Restored { .. }));

        // Marker was propagated, local is populated: equal markers → skip.
        let second = restore(&roots, Category::Workspace, false);
        assert_eq!(
            second,
            RestoreOutcome::Skipped {
                reason: "local copy is current".to_string()
            }
        );
    }

    #[test]
    fn newer_remote_marker_triggers_re_restore() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "v1");
        write(&roots.backup, ".last-sync", "2024-01-01T00:00:00Z");
        restore(&roots, Category::Workspace, false);

        write(&roots.backup, "openclaw-workspace/memory/notes.md", "v2");
        write(&roots.backup, ".last-sync", "2024-06-01T00:00:00Z");
        let outcome = restore(&roots, Category::Workspace, false);
        assert!(matches!(outcome, RestoreOutcome::Restored { .. }));
        assert_eq!(
            fs::read_to_string(roots.agent_workspace().join("memory/notes.md"))
                .expect("read"),
            "v2"
        );
    }

    #[test]
    fn flat_legacy_config_copies_and_renames() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "clawdbot.json", r#"{"agent":{}}"#);
        write(&roots.backup, "credentials.json", "{}");
        // Sibling categories at the flat root must not ride along.
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "ws");
        write(&roots.backup, "skills/s.md", "skill");
        write(&roots.backup, ".last-sync", "2024-01-01T00:00:00Z");

        let outcome = restore(&roots, Category::Config, false);
        assert!(matches!(outcome, RestoreOutcome::Restored { .. }));
        assert_eq!(
            fs::read_to_string(roots.config_path()).expect("read canonical"),
            r#"{"agent":{}}"#,
            "legacy filename must be migrated to the canonical name"
        );
        assert!(!roots.legacy_config_path().exists());
        assert!(roots.state.join("credentials.json").exists());
        assert!(
            !roots.state.join("openclaw-workspace").exists()
                && !roots.state.join("skills").exists(),
            "sibling category trees must be excluded from a flat config copy"
        );
        assert_eq!(
            sync_clock::read_marker(&roots.state_marker()).as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn migration_never_clobbers_canonical_config() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.state, "openclaw.json", r#"{"keep":"me"}"#);
        write(&roots.state, "clawdbot.json", r#"{"old":"copy"}"#);

        migrate_legacy_config_name(&roots).expect("migrate");
        assert_eq!(
            fs::read_to_string(roots.config_path()).expect("read"),
            r#"{"keep":"me"}"#
        );
        assert!(roots.legacy_config_path().exists());
    }

    #[test]
    fn config_bootstrap_probe_ignores_sibling_trees_in_state() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        // State root already populated by a workspace restore, but no
        // config document: still the bootstrap case for config.
        write(&roots.state, "workspace/memory/notes.md", "ws");
        write(&roots.state, ".last-sync", "2099-01-01T00:00:00Z");
        write(&roots.backup, "openclaw/openclaw.json", r#"{"a":1}"#);

        let outcome = restore(&roots, Category::Config, false);
        assert!(
            matches!(outcome, RestoreOutcome::Restored { .. }),
            "missing config document must restore even when markers say skip"
        );
    }

    #[test]
    fn dry_run_decides_but_writes_nothing() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "hello");

        let outcome = restore(&roots, Category::Workspace, true);
        assert!(matches!(outcome, RestoreOutcome::WouldRestore { .. }));
        assert!(
            !roots.agent_workspace().exists(),
            "dry-run must not create the destination"
        );
        assert!(!roots.state_marker().exists(), "dry-run must not propagate markers");
    }

    #[test]
    fn local_files_absent_from_backup_survive() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-skills/from-backup.md", "remote");
        write(&roots.backup, ".last-sync", "2024-06-01T00:00:00Z");
        write(&roots.skills_dir(), "local-only.md", "mine");
        write(&roots.state, ".last-sync", "2024-01-01T00:00:00Z");

        let outcome = restore(&roots, Category::Skills, false);
        assert!(matches!(outcome, RestoreOutcome::Restored { .. }));
        assert!(roots.skills_dir().join("local-only.md").exists());
        assert!(roots.skills_dir().join("from-backup.md").exists());
    }
}
