//! `clawboot restore` — reconcile categories against the remote backup.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use clawboot_core::BootRoots;
use clawboot_restore::{
    pipeline::{self, RestoreScope},
    BootstrapReport, MirrorOutcome, RestoreOutcome,
};

use crate::CategoryArg;

/// Arguments for `clawboot restore`.
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Category to reconcile (omit when using `--all`).
    pub category: Option<CategoryArg>,

    /// Reconcile every category plus the workspace mirror.
    #[arg(long, conflicts_with = "category")]
    pub all: bool,

    /// Show what would be restored without writing anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl RestoreArgs {
    pub fn run(self) -> Result<()> {
        let roots = BootRoots::resolve().context("could not resolve bootstrap roots")?;

        let scope = match (self.category, self.all) {
            (Some(category), _) => RestoreScope::Category(category.into()),
            (None, true) => RestoreScope::All,
            (None, false) => {
                anyhow::bail!("provide a category (config|workspace|skills) or use --all")
            }
        };

        let report = pipeline::run(&roots, scope, self.dry_run);
        print_report(&report, self.dry_run);
        Ok(())
    }
}

/// Shared report printer for `restore` and `run`.
pub(crate) fn print_report(report: &BootstrapReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for entry in &report.categories {
        let category = entry.category.to_string();
        match &entry.outcome {
            RestoreOutcome::Restored { source, files } => println!(
                "{prefix}{} '{category}' restored from {} ({files} file(s), {} layout)",
                "✓".green(),
                source.display(),
                entry.layout,
            ),
            RestoreOutcome::WouldRestore { source } => println!(
                "{prefix}{} '{category}' would restore from {} ({} layout)",
                "~".yellow(),
                source.display(),
                entry.layout,
            ),
            RestoreOutcome::Skipped { reason } => {
                println!("{prefix}{} '{category}' skipped — {reason}", "·".dimmed())
            }
            RestoreOutcome::Failed { error } => println!(
                "{prefix}{} '{category}' failed: {error}",
                "✗".red(),
            ),
        }
    }

    if let Some(mirror) = &report.mirror {
        match mirror {
            MirrorOutcome::BothEmpty => {
                println!("{prefix}{} mirror: both sides empty", "·".dimmed())
            }
            MirrorOutcome::CopiedToTool { files } => println!(
                "{prefix}{} mirror: populated tool side ({files} file(s))",
                "✓".green()
            ),
            MirrorOutcome::CopiedToAgent { files } => println!(
                "{prefix}{} mirror: populated agent side ({files} file(s))",
                "✓".green()
            ),
            MirrorOutcome::BothPopulated { diverged: false } => {
                println!("{prefix}{} mirror: both sides in sync", "·".dimmed())
            }
            MirrorOutcome::BothPopulated { diverged: true } => println!(
                "{prefix}{} mirror: sides have diverged (kept as-is)",
                "!".yellow()
            ),
            MirrorOutcome::WouldCopy { into_tool_side } => println!(
                "{prefix}{} mirror: would populate {} side",
                "~".yellow(),
                if *into_tool_side { "tool" } else { "agent" },
            ),
            MirrorOutcome::Failed { error } => {
                println!("{prefix}{} mirror failed: {error}", "✗".red())
            }
        }
    }
}
