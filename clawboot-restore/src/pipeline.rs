//! Sequential bootstrap pipeline shared by `clawboot run` and
//! `clawboot restore`.
//!
//! Order is fixed: config, then workspace, then skills, then the workspace
//! mirror. A category failure is captured in its report and logged; it
//! never aborts the other categories or the boot. A partially restored
//! agent beats a gateway that never starts.

use std::path::PathBuf;

use serde::Serialize;

use clawboot_core::{BackupLayout, BootRoots, Category, RestoreDecision};

use crate::layout;
use crate::mirror::{self, MirrorOutcome};
use crate::restore::{self, RestoreOutcome, Verdict};
use crate::sync_clock;

/// Scope for a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreScope {
    /// Reconcile every category plus the workspace mirror.
    All,
    /// Reconcile a single category (mirror included for workspace).
    Category(Category),
}

impl RestoreScope {
    fn categories(self) -> Vec<Category> {
        match self {
            RestoreScope::All => Category::all().to_vec(),
            RestoreScope::Category(category) => vec![category],
        }
    }

    fn includes_workspace(self) -> bool {
        matches!(
            self,
            RestoreScope::All | RestoreScope::Category(Category::Workspace)
        )
    }
}

/// Per-category outcome, suitable for human and JSON reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub layout: BackupLayout,
    pub source: Option<PathBuf>,
    pub outcome: RestoreOutcome,
}

/// Outcome of one full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub categories: Vec<CategoryReport>,
    /// Present when the scope covered the workspace category.
    pub mirror: Option<MirrorOutcome>,
}

impl BootstrapReport {
    /// True when at least one category (or the mirror) failed.
    pub fn has_failures(&self) -> bool {
        self.categories
            .iter()
            .any(|report| matches!(report.outcome, RestoreOutcome::Failed { .. }))
            || matches!(self.mirror, Some(MirrorOutcome::Failed { .. }))
    }
}

/// Run the reconciliation pipeline for a scope.
pub fn run(roots: &BootRoots, scope: RestoreScope, dry_run: bool) -> BootstrapReport {
    let mut categories = Vec::new();

    for category in scope.categories() {
        let resolved = layout::resolve(&roots.backup, category);
        let outcome =
            match restore::restore_if_needed(roots, category, &resolved, dry_run) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(
                        %category,
                        error = %err,
                        "restore failed; category left unrestored",
                    );
                    RestoreOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
        categories.push(CategoryReport {
            category,
            layout: resolved.layout,
            source: resolved.source,
            outcome,
        });
    }

    let mirror = if scope.includes_workspace() {
        Some(
            match mirror::reconcile(&roots.agent_workspace(), &roots.tool_workspace, dry_run) {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(error = %err, "workspace mirror failed; sides left as-is");
                    MirrorOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            },
        )
    } else {
        None
    };

    BootstrapReport { categories, mirror }
}

// ---------------------------------------------------------------------------
// Plan (read-only view for `clawboot status`)
// ---------------------------------------------------------------------------

/// Read-only per-category view of what the next boot would decide.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPlan {
    pub category: Category,
    pub layout: BackupLayout,
    pub source: Option<PathBuf>,
    pub destination: PathBuf,
    pub remote_marker: Option<String>,
    pub local_marker: Option<String>,
    pub verdict: Verdict,
    pub decision: RestoreDecision,
}

/// Compute plans for every category without touching anything.
pub fn plan(roots: &BootRoots) -> Vec<CategoryPlan> {
    let remote_marker = sync_clock::read_marker(&roots.backup_marker());
    let local_marker = sync_clock::read_marker(&roots.state_marker());

    Category::all()
        .iter()
        .map(|&category| {
            let resolved = layout::resolve(&roots.backup, category);
            let verdict = restore::decide(roots, category, &resolved);
            CategoryPlan {
                category,
                layout: resolved.layout,
                source: resolved.source,
                destination: restore::destination(roots, category),
                remote_marker: remote_marker.clone(),
                local_marker: local_marker.clone(),
                verdict,
                decision: verdict.decision(),
            }
        })
        .collect()
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

    #[test]
    fn empty_backup_yields_all_skips_and_empty_mirror() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);

        let report = run(&roots, RestoreScope::All, false);
        assert_eq!(report.categories.len(), 3);
        for category in &report.categories {
            assert!(matches!(category.outcome, RestoreOutcome::Skipped { .. }));
            assert_eq!(category.layout, BackupLayout::Absent);
        }
        assert_eq!(report.mirror, Some(MirrorOutcome::BothEmpty));
        assert!(!report.has_failures());
    }

    #[test]
    fn full_run_restores_and_mirrors_workspace() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw/openclaw.json", r#"{"agent":{}}"#);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "ws");
        write(&roots.backup, "openclaw-skills/skill.md", "sk");
        write(&roots.backup, ".last-sync", "2024-01-01T00:00:00Z");

        let report = run(&roots, RestoreScope::All, false);
        assert!(report
            .categories
            .iter()
            .all(|c| matches!(c.outcome, RestoreOutcome::Restored { .. })));
        assert_eq!(report.mirror, Some(MirrorOutcome::CopiedToTool { files: 1 }));

        assert!(roots.config_path().is_file());
        assert!(roots.tool_workspace.join("memory/notes.md").is_file());
        assert!(roots.skills_dir().join("skill.md").is_file());
    }

    #[test]
    fn categories_run_in_config_first_order() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        let report = run(&roots, RestoreScope::All, true);
        let order: Vec<Category> = report.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![Category::Config, Category::Workspace, Category::Skills]
        );
    }

    #[test]
    fn single_category_scope_skips_mirror_for_non_workspace() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        let report = run(&roots, RestoreScope::Category(Category::Skills), true);
        assert_eq!(report.categories.len(), 1);
        assert!(report.mirror.is_none());
    }

    #[test]
    fn workspace_scope_includes_mirror() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        let report = run(&roots, RestoreScope::Category(Category::Workspace), true);
        assert!(report.mirror.is_some());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw/openclaw.json", "{}");
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "ws");

        let report = run(&roots, RestoreScope::All, true);
        assert!(report
            .categories
            .iter()
            .take(2)
            .all(|c| matches!(c.outcome, RestoreOutcome::WouldRestore { .. })));
        assert!(!roots.state.exists(), "dry-run must not create local state");
        assert!(!roots.tool_workspace.exists());
    }

    #[test]
    fn plan_reports_markers_and_decisions() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "ws");
        write(&roots.backup, ".last-sync", "2024-01-01T00:00:00Z");

        let plans = plan(&roots);
        assert_eq!(plans.len(), 3);

        let workspace = plans
            .iter()
            .find(|p| p.category == Category::Workspace)
            .expect("workspace plan");
        assert_eq!(workspace.layout, BackupLayout::Current);
        assert_eq!(workspace.verdict, Verdict::Bootstrap);
        assert_eq!(workspace.decision, RestoreDecision::Restore);
        assert_eq!(
            workspace.remote_marker.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(workspace.local_marker, None);

        let config = plans
            .iter()
            .find(|p| p.category == Category::Config)
            .expect("config plan");
        assert_eq!(config.layout, BackupLayout::Absent);
        assert_eq!(config.verdict, Verdict::NoBackup);
        assert_eq!(config.decision, RestoreDecision::Skip);
    }

    #[test]
    fn plan_is_read_only() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw/openclaw.json", "{}");

        let _ = plan(&roots);
        assert!(!roots.state.exists());
    }

    #[test]
    fn failed_copy_poisons_only_its_own_category() {
        let tmp = TempDir::new().expect("tempdir");
        let roots = roots_over(&tmp);
        write(&roots.backup, "openclaw/openclaw.json", r#"{"a":1}"#);
        write(&roots.backup, "openclaw-workspace/memory/notes.md", "ws");
        write(&roots.backup, "openclaw-skills/skill.md", "sk");
        // A stray *file* where the workspace directory belongs makes that
        // category's copy fail; config and skills must still restore.
        fs::create_dir_all(&roots.state).expect("mkdir state");
        fs::write(roots.agent_workspace(), "not a directory").expect("write");

        let report = run(&roots, RestoreScope::All, false);
        let outcomes: Vec<_> = report
            .categories
            .iter()
            .map(|c| (c.category, matches!(c.outcome, RestoreOutcome::Restored { .. })))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                (Category::Config, true),
                (Category::Workspace, false),
                (Category::Skills, true),
            ]
        );
        let workspace = &report.categories[1];
        assert!(matches!(workspace.outcome, RestoreOutcome::Failed { .. }));
        assert!(report.has_failures());
    }
}
