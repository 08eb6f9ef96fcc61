//! `clawboot patch-config` — apply or preview the environment patch.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use clawboot_config::{patcher, preview, Document, PatchEnv};
use clawboot_core::BootRoots;

/// Arguments for `clawboot patch-config`.
#[derive(Args, Debug)]
pub struct PatchConfigArgs {
    /// Show a unified diff of the pending patch without writing.
    #[arg(long)]
    pub dry_run: bool,
}

impl PatchConfigArgs {
    pub fn run(self) -> Result<()> {
        let roots = BootRoots::resolve().context("could not resolve bootstrap roots")?;
        let path = roots.config_path();

        let before = Document::load(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut after = before.clone();
        patcher::patch(&mut after, &PatchEnv::from_env());

        let diff = preview::preview(&before, &after);

        if self.dry_run {
            match diff {
                Some(diff) => println!("{diff}"),
                None => println!("{} config already patched", "·".dimmed()),
            }
            return Ok(());
        }

        if diff.is_none() {
            println!("{} config already patched, nothing to write", "·".dimmed());
            return Ok(());
        }

        after
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{} config patched at {}", "✓".green(), path.display());
        Ok(())
    }
}
