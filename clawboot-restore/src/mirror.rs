//! Workspace mirroring across the two local roots.
//!
//! The agent runtime and the tool sandbox read the same workspace through
//! different paths; after bootstrap both must hold identical content. Copy
//! direction is whichever side is non-empty into whichever side is empty.
//! Both non-empty → no action: first-populated wins, and drift between the
//! sides is detected and logged but never merged.

use std::path::Path;

use serde::Serialize;

use clawboot_core::paths::dir_is_populated;

use crate::copy::{copy_tree, tree_digest};
use crate::error::RestoreError;

/// Outcome of one mirror reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "result")]
pub enum MirrorOutcome {
    /// Neither side has content yet.
    BothEmpty,
    /// Agent side was populated; copied into the empty tool side.
    CopiedToTool { files: u64 },
    /// Tool side was populated; copied into the empty agent side.
    CopiedToAgent { files: u64 },
    /// Both sides already populated; untouched. `diverged` records whether
    /// their content digests differ.
    BothPopulated { diverged: bool },
    /// Dry-run: a copy *would* have happened in the named direction.
    WouldCopy { into_tool_side: bool },
    /// The mirror copy failed; boot continues with one side empty.
    Failed { error: String },
}

/// Establish the mirror invariant between the agent-visible and
/// tool-visible workspace roots.
pub fn reconcile(
    agent_side: &Path,
    tool_side: &Path,
    dry_run: bool,
) -> Result<MirrorOutcome, RestoreError> {
    let agent_populated = dir_is_populated(agent_side);
    let tool_populated = dir_is_populated(tool_side);

    match (agent_populated, tool_populated) {
        (false, false) => {
            tracing::debug!("both workspace mirrors empty, nothing to reconcile");
            Ok(MirrorOutcome::BothEmpty)
        }
        (true, false) => copy_into(agent_side, tool_side, true, dry_run),
        (false, true) => copy_into(tool_side, agent_side, false, dry_run),
        (true, true) => {
            let diverged = sides_diverged(agent_side, tool_side)?;
            if diverged {
                tracing::warn!(
                    agent = %agent_side.display(),
                    tool = %tool_side.display(),
                    "workspace mirrors have diverged; keeping both as-is (first-populated wins)",
                );
            }
            Ok(MirrorOutcome::BothPopulated { diverged })
        }
    }
}

fn copy_into(
    src: &Path,
    dst: &Path,
    into_tool_side: bool,
    dry_run: bool,
) -> Result<MirrorOutcome, RestoreError> {
    if dry_run {
        tracing::info!(
            from = %src.display(),
            to = %dst.display(),
            "[dry-run] would mirror workspace",
        );
        return Ok(MirrorOutcome::WouldCopy { into_tool_side });
    }
    let files = copy_tree(src, dst)?;
    tracing::info!(
        from = %src.display(),
        to = %dst.display(),
        files,
        "mirrored workspace into empty side",
    );
    Ok(if into_tool_side {
        MirrorOutcome::CopiedToTool { files }
    } else {
        MirrorOutcome::CopiedToAgent { files }
    })
}

fn sides_diverged(a: &Path, b: &Path) -> Result<bool, RestoreError> {
    Ok(tree_digest(a)? != tree_digest(b)?)
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

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, contents).expect("write");
    }

    #[test]
    fn both_empty_is_noop() {
        let tmp = TempDir::new().expect("tempdir");
        let outcome = reconcile(&tmp.path().join("a"), &tmp.path().join("b"), false)
            .expect("reconcile");
        assert_eq!(outcome, MirrorOutcome::BothEmpty);
        assert!(!tmp.path().join("a").exists() && !tmp.path().join("b").exists());
    }

    #[test]
    fn populated_agent_side_fills_empty_tool_side() {
        let tmp = TempDir::new().expect("tempdir");
        let agent = tmp.path().join("agent");
        let tool = tmp.path().join("tool");
        write(&agent, "memory/notes.md", "content");

        let outcome = reconcile(&agent, &tool, false).expect("reconcile");
        assert_eq!(outcome, MirrorOutcome::CopiedToTool { files: 1 });
        assert_eq!(
            fs::read_to_string(tool.join("memory/notes.md")).expect("read"),
            "content"
        );
        assert_eq!(
            tree_digest(&agent).expect("digest"),
            tree_digest(&tool).expect("digest"),
            "mirrors must be content-equal after reconciliation"
        );
    }

    #[test]
    fn populated_tool_side_fills_empty_agent_side() {
        let tmp = TempDir::new().expect("tempdir");
        let agent = tmp.path().join("agent");
        let tool = tmp.path().join("tool");
        write(&tool, "assets/logo.svg", "<svg/>");

        let outcome = reconcile(&agent, &tool, false).expect("reconcile");
        assert_eq!(outcome, MirrorOutcome::CopiedToAgent { files: 1 });
        assert!(agent.join("assets/logo.svg").exists());
    }

    #[test]
    fn both_populated_and_identical_is_untouched() {
        let tmp = TempDir::new().expect("tempdir");
        let agent = tmp.path().join("agent");
        let tool = tmp.path().join("tool");
        write(&agent, "x.md", "same");
        write(&tool, "x.md", "same");

        let outcome = reconcile(&agent, &tool, false).expect("reconcile");
        assert_eq!(outcome, MirrorOutcome::BothPopulated { diverged: false });
    }

    #[test]
    fn both_populated_and_diverged_stays_diverged() {
        let tmp = TempDir::new().expect("tempdir");
        let agent = tmp.path().join("agent");
        let tool = tmp.path().join("tool");
        write(&agent, "x.md", "agent version");
        write(&tool, "x.md", "tool version");

        let outcome = reconcile(&agent, &tool, false).expect("reconcile");
        assert_eq!(outcome, MirrorOutcome::BothPopulated { diverged: true });
        // No conflict resolution: both sides keep their content.
        assert_eq!(
            fs::read_to_string(agent.join("x.md")).expect("read"),
            "agent version"
        );
        assert_eq!(
            fs::read_to_string(tool.join("x.md")).expect("read"),
            "tool version"
        );
    }

    #[test]
    fn dry_run_reports_direction_without_copying() {
        let tmp = TempDir::new().expect("tempdir");
        let agent = tmp.path().join("agent");
        let tool = tmp.path().join("tool");
        write(&agent, "x.md", "content");

        let outcome = reconcile(&agent, &tool, true).expect("reconcile");
        assert_eq!(outcome, MirrorOutcome::WouldCopy { into_tool_side: true });
        assert!(!tool.exists(), "dry-run must not create the tool side");
    }
}
