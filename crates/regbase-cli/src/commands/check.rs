//! Check, redundant and fix command implementations
//!
//! These commands compare a baseline with a snapshot of live entries.

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use regbase_core::{
    ComplianceStatus, DriftStatus, RegistryStore, RemediateOptions, Remediator, Report,
    SnapshotStore,
};
use regbase_fs::NormalizedPath;

use super::{load_snapshot, open_workspace, status_label};
use crate::error::{CliError, Result};

fn print_rows(report: &Report) {
    for row in report.rows() {
        let actual = match (&row.actual_data, &row.actual_type) {
            (Some(data), Some(ty)) => format!("{} [{}]", data, ty),
            _ => "absent".dimmed().to_string(),
        };
        println!(
            "   {} {}  expected {} [{}], actual {}",
            status_label(row.status),
            row.key().cyan(),
            row.expected_data,
            row.expected_type,
            actual
        );
        if let Some(note) = &row.note {
            println!("            {}", note.dimmed());
        }
    }
}

/// Run the check command
///
/// Prints entries needing attention (or every entry with `all`).
pub fn run_check(
    root: &Path,
    baseline: &str,
    snapshot: &Path,
    under: Option<&str>,
    all: bool,
    json: bool,
) -> Result<()> {
    let ws = open_workspace(root)?;
    let actual = load_snapshot(snapshot, under)?;
    let report = ws.reconcile(baseline, &actual)?;
    let view = if all { &report.full } else { &report.filtered };

    if json {
        let output = json!({
            "baseline": baseline,
            "overall": report.full.overall(),
            "summary": report.full.summary(),
            "entries": view,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} Checking baseline {} against {}...",
        "=>".blue().bold(),
        baseline.cyan(),
        snapshot.display()
    );
    print_rows(view);

    let summary = report.full.summary();
    println!();
    println!(
        "   {} pass, {} fail, {} missing, {} protected present, {} protected absent",
        summary.pass, summary.fail, summary.missing, summary.exist, summary.not_exist
    );

    match report.full.overall() {
        ComplianceStatus::Compliant => {
            println!("{} Machine matches baseline {}.", "OK".green().bold(), baseline);
        }
        ComplianceStatus::Missing => {
            println!("{} Some baseline entries are missing.", "MISSING".yellow().bold());
            println!("Run {} to repair.", format!("regbase fix {}", baseline).cyan());
        }
        ComplianceStatus::Drifted => {
            println!("{} Machine has drifted from the baseline.", "DRIFTED".red().bold());
            println!("Run {} to repair.", format!("regbase fix {}", baseline).cyan());
        }
    }

    Ok(())
}

/// Run the redundant command
///
/// Lists every live entry with its status relative to the baseline; entries
/// the baseline does not know about show as `Missing`.
pub fn run_redundant(
    root: &Path,
    baseline: &str,
    snapshot: &Path,
    under: Option<&str>,
    json: bool,
) -> Result<()> {
    let ws = open_workspace(root)?;
    let actual = load_snapshot(snapshot, under)?;
    let report = ws.reconcile(baseline, &actual)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.redundant)?);
        return Ok(());
    }

    println!(
        "{} Live entries in {} compared with baseline {}...",
        "=>".blue().bold(),
        snapshot.display(),
        baseline.cyan()
    );
    print_rows(&report.redundant);

    let extra = report
        .redundant
        .rows()
        .filter(|r| r.status == DriftStatus::Missing)
        .count();
    println!();
    println!("   {} live entries, {} not in the baseline", report.redundant.len(), extra);
    Ok(())
}

/// Run the fix command
///
/// Writes baseline values into the snapshot for every `Fail` or `Missing`
/// entry.
pub fn run_fix(root: &Path, baseline: &str, snapshot: &Path, dry_run: bool) -> Result<()> {
    println!(
        "{} Fixing drift from baseline {}...",
        "=>".blue().bold(),
        baseline.cyan()
    );

    let ws = open_workspace(root)?;
    let expected = ws.load_baseline(baseline)?;
    let mut store = SnapshotStore::new(NormalizedPath::new(snapshot));
    let actual = store.read_all("")?;
    let report = ws.reconciler().full_report(&expected.entries, &actual);

    let fixable = report
        .rows()
        .any(|r| matches!(r.status, DriftStatus::Fail | DriftStatus::Missing));
    if !fixable {
        println!("{} Nothing to fix.", "OK".green().bold());
        return Ok(());
    }

    let audit = ws.audit_log();
    let result = Remediator::new(&mut store, &audit, RemediateOptions { dry_run })
        .remediate(&expected.entries, &report);

    if result.success {
        println!("{} Fix complete:", "OK".green().bold());
        for action in &result.actions {
            println!("   {} {}", "+".green(), action);
        }
    } else {
        println!("{} Fix operation failed:", "ERROR".red().bold());
        for error in &result.errors {
            println!("   {} {}", "!".red(), error);
        }
        return Err(CliError::user("Fix operation failed"));
    }

    Ok(())
}
