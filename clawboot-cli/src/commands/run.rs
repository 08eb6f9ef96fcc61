//! `clawboot run` — the one-shot container bootstrap.
//!
//! Sequence: running-gateway guard → reconcile all categories → mirror →
//! environment patch over the configuration document → stale lock cleanup
//! → gateway handoff. Reconciliation and patching degrade on failure;
//! only a gateway that cannot be spawned fails the boot.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use clawboot_config::{patcher, preview, Document, PatchEnv};
use clawboot_core::{paths, BootRoots};
use clawboot_launcher as launcher;
use clawboot_restore::pipeline::{self, RestoreScope};

/// Arguments for `clawboot run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Plan restores and preview the config patch without touching disk
    /// or launching anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Reconcile and patch, but skip the gateway handoff.
    #[arg(long)]
    pub no_launch: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let roots = BootRoots::resolve().context("could not resolve bootstrap roots")?;

        // One bootstrap per container instance.
        if launcher::gateway_running(&roots.state) {
            println!("gateway already running; nothing to do");
            return Ok(());
        }

        let report = pipeline::run(&roots, RestoreScope::All, self.dry_run);
        super::restore::print_report(&report, self.dry_run);

        let env = PatchEnv::from_env();
        self.patch_config(&roots, &env)?;

        if self.dry_run || self.no_launch {
            println!(
                "{} launch skipped ({})",
                "·".dimmed(),
                if self.dry_run { "dry-run" } else { "--no-launch" },
            );
            return Ok(());
        }

        launcher::clear_stale_locks(&roots.state);
        let status = launcher::launch(
            &roots.state,
            &paths::gateway_bin(),
            patcher::GATEWAY_PORT,
            env.token_supplied(),
        )
        .context("gateway handoff failed")?;

        if !status.success() {
            anyhow::bail!("gateway exited with {status}");
        }
        Ok(())
    }

    /// Apply the environment patch. The patch itself never fails; a
    /// document that cannot be read or written degrades with a warning,
    /// and the gateway still starts, just unpatched.
    fn patch_config(&self, roots: &BootRoots, env: &PatchEnv) -> Result<()> {
        let path = roots.config_path();
        let before = match Document::load(&path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(error = %err, "config unreadable; patching a fresh document");
                Document::new()
            }
        };

        let mut after = before.clone();
        patcher::patch(&mut after, env);

        if self.dry_run {
            match preview::preview(&before, &after) {
                Some(diff) => println!("{diff}"),
                None => println!("{} config already patched", "·".dimmed()),
            }
            return Ok(());
        }

        if let Err(err) = after.save(&path) {
            tracing::warn!(error = %err, "could not persist patched config; continuing");
        } else {
            println!("{} config patched at {}", "✓".green(), path.display());
        }
        Ok(())
    }
}
