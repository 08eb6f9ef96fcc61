//! Backup layout resolution.
//!
//! Probe precedence per category (first hit wins):
//! 1. `Current` — openclaw-prefixed location
//! 2. `LegacyNested` — one directory level too deep (old producer defect)
//! 3. `LegacyFlat` — category data directly at the backup root
//! 4. `Absent` — nothing recognizable; legitimate "nothing to restore"
//!
//! Resolution is stateless, re-derived every boot, and never mutates the
//! remote store.

use std::path::{Path, PathBuf};

use clawboot_core::paths::{
    dir_is_populated, CONFIG_BACKUP_CURRENT, CONFIG_BACKUP_LEGACY, CONFIG_FILE,
    LEGACY_CONFIG_FILE, SKILLS_BACKUP_CURRENT, SKILLS_BACKUP_LEGACY, WORKSPACE_BACKUP_CURRENT,
    WORKSPACE_BACKUP_LEGACY, WORKSPACE_MARKER_DIR,
};
use clawboot_core::{BackupLayout, Category};

/// Outcome of layout resolution for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackup {
    pub layout: BackupLayout,
    /// Directory to copy from. `None` iff the layout is `Absent`.
    pub source: Option<PathBuf>,
}

impl ResolvedBackup {
    fn absent() -> Self {
        Self {
            layout: BackupLayout::Absent,
            source: None,
        }
    }

    fn found(layout: BackupLayout, source: PathBuf) -> Self {
        Self {
            layout,
            source: Some(source),
        }
    }
}

/// Classify the backup root's shape for `category` and return the concrete
/// path to read from.
pub fn resolve(backup_root: &Path, category: Category) -> ResolvedBackup {
    match category {
        Category::Config => resolve_config(backup_root),
        Category::Workspace => resolve_tree(
            backup_root,
            WORKSPACE_BACKUP_CURRENT,
            WORKSPACE_BACKUP_LEGACY,
            true,
        ),
        Category::Skills => resolve_tree(
            backup_root,
            SKILLS_BACKUP_CURRENT,
            SKILLS_BACKUP_LEGACY,
            false,
        ),
    }
}

/// Config is located by its canonical marker file, not by directory
/// emptiness — a config tree with only auxiliary files is not a config
/// backup. The source is always the *containing* directory so the restore
/// copy picks up sibling files (credentials, session state).
fn resolve_config(backup_root: &Path) -> ResolvedBackup {
    let current = backup_root.join(CONFIG_BACKUP_CURRENT);
    if current.join(CONFIG_FILE).is_file() {
        return ResolvedBackup::found(BackupLayout::Current, current);
    }

    let nested = backup_root.join(CONFIG_BACKUP_LEGACY);
    if nested.join(LEGACY_CONFIG_FILE).is_file() {
        return ResolvedBackup::found(BackupLayout::LegacyNested, nested);
    }

    if backup_root.join(LEGACY_CONFIG_FILE).is_file() {
        return ResolvedBackup::found(BackupLayout::LegacyFlat, backup_root.to_path_buf());
    }

    ResolvedBackup::absent()
}

/// Workspace and skills are located by non-empty directories. Workspace
/// additionally applies the double-nesting heuristic (`nested` flag).
fn resolve_tree(
    backup_root: &Path,
    current_name: &str,
    legacy_name: &str,
    check_nesting: bool,
) -> ResolvedBackup {
    let candidates = [
        (BackupLayout::Current, backup_root.join(current_name)),
        (BackupLayout::LegacyFlat, backup_root.join(legacy_name)),
    ];

    for (layout, candidate) in candidates {
        if !dir_is_populated(&candidate) {
            continue;
        }
        if check_nesting {
            if let Some(nested) = nested_workspace(&candidate) {
                return ResolvedBackup::found(BackupLayout::LegacyNested, nested);
            }
        }
        return ResolvedBackup::found(layout, candidate);
    }

    ResolvedBackup::absent()
}

/// Double-nesting defect: an old producer wrote `<candidate>/workspace/...`
/// instead of `<candidate>/...`. When the candidate holds a non-empty
/// `workspace` subdirectory but lacks the `memory` marker directory a real
/// workspace tree always has, the nested subdirectory is the actual backup.
fn nested_workspace(candidate: &Path) -> Option<PathBuf> {
    let nested = candidate.join(WORKSPACE_BACKUP_LEGACY);
    let has_marker = candidate.join(WORKSPACE_MARKER_DIR).is_dir();
    if dir_is_populated(&nested) && !has_marker {
        Some(nested)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
