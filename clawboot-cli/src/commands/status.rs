//! `clawboot status` — backup layout and next-boot decision visibility.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use clawboot_core::{BootRoots, RestoreDecision};
use clawboot_launcher as launcher;
use clawboot_restore::{pipeline, sync_clock, CategoryPlan};

/// Arguments for `clawboot status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let roots = BootRoots::resolve().context("could not resolve bootstrap roots")?;
        let plans = pipeline::plan(&roots);
        let gateway_running = launcher::gateway_running(&roots.state);

        if self.json {
            print_json(&roots, &plans, gateway_running)?;
            return Ok(());
        }

        print_table(&roots, &plans, gateway_running);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusReportJson<'a> {
    backup_root: String,
    state_root: String,
    gateway_running: bool,
    categories: &'a [CategoryPlan],
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "category")]
    category: String,
    #[tabled(rename = "layout")]
    layout: String,
    #[tabled(rename = "source")]
    source: String,
    #[tabled(rename = "remote mark")]
    remote_mark: String,
    #[tabled(rename = "local mark")]
    local_mark: String,
    #[tabled(rename = "next boot")]
    next_boot: String,
}

fn print_json(
    roots: &BootRoots,
    plans: &[CategoryPlan],
    gateway_running: bool,
) -> Result<()> {
    let report = StatusReportJson {
        backup_root: roots.backup.display().to_string(),
        state_root: roots.state.display().to_string(),
        gateway_running,
        categories: plans,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render status JSON")?
    );
    Ok(())
}

fn print_table(roots: &BootRoots, plans: &[CategoryPlan], gateway_running: bool) {
    let rows: Vec<StatusTableRow> = plans
        .iter()
        .map(|plan| StatusTableRow {
            category: plan.category.to_string(),
            layout: plan.layout.to_string(),
            source: plan
                .source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "—".to_string()),
            remote_mark: render_marker(plan.remote_marker.as_deref()),
            local_mark: render_marker(plan.local_marker.as_deref()),
            next_boot: plan.decision.to_string(),
        })
        .collect();

    println!(
        "backup: {}   state: {}   gateway: {}",
        roots.backup.display(),
        roots.state.display(),
        if gateway_running {
            "running".green()
        } else {
            "stopped".dimmed()
        },
    );
    println!("{}", Table::new(rows).with(Style::sharp()));

    let restores = plans
        .iter()
        .filter(|p| p.decision == RestoreDecision::Restore)
        .count();
    if restores > 0 {
        println!(
            "{}",
            format!("{restores} categor(ies) would restore on the next boot").yellow()
        );
    }
}

/// `<raw value> (<age>)`, or a dash for an absent marker.
fn render_marker(marker: Option<&str>) -> String {
    match marker {
        None => "—".to_string(),
        Some(raw) => {
            let epoch = sync_clock::parse_epoch(raw);
            if epoch == 0 {
                return format!("{raw} (unparseable)");
            }
            let age = (chrono::Utc::now().timestamp() - epoch).max(0) as u64;
            format!("{raw} ({} ago)", format_seconds(age))
        }
    }
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}
