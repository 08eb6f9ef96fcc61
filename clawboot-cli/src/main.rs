//! clawboot — OpenClaw gateway container bootstrap CLI.
//!
//! # Usage
//!
//! ```text
//! clawboot run [--dry-run] [--no-launch]
//! clawboot restore [config|workspace|skills] [--all] [--dry-run]
//! clawboot status [--json]
//! clawboot patch-config [--dry-run]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use clawboot_core::Category;
use commands::{
    patch::PatchConfigArgs, restore::RestoreArgs, run::RunArgs, status::StatusArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "clawboot",
    version,
    about = "Reconcile an OpenClaw gateway container against its remote backup",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full bootstrap: reconcile, patch config, hand off to the gateway.
    Run(RunArgs),

    /// Reconcile one category (or all) against the remote backup.
    Restore(RestoreArgs),

    /// Show per-category layout, markers, and next-boot decisions.
    Status(StatusArgs),

    /// Apply environment settings to the configuration document.
    PatchConfig(PatchConfigArgs),
}

// ---------------------------------------------------------------------------
// Shared Category argument — parsed from CLI strings, converts to core type
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse [`Category`] from CLI args.
#[derive(Debug, Clone, Copy)]
pub struct CategoryArg(pub Category);

impl FromStr for CategoryArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "config" => Ok(Self(Category::Config)),
            "workspace" => Ok(Self(Category::Workspace)),
            "skills" => Ok(Self(Category::Skills)),
            other => Err(format!(
                "unknown category '{other}'; expected: config, workspace, skills"
            )),
        }
    }
}

impl fmt::Display for CategoryArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        c.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Restore(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::PatchConfig(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
