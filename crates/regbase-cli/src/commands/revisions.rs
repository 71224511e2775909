//! Revision and baseline listing

use std::path::Path;

use colored::Colorize;

use super::open_workspace;
use crate::error::Result;

/// Run the revisions command
pub fn run_revisions(root: &Path, baseline: &str, json: bool) -> Result<()> {
    let ws = open_workspace(root)?;
    let revisions = ws.revisions().list(baseline)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&revisions)?);
        return Ok(());
    }

    if revisions.is_empty() {
        println!("No revisions of {} yet.", baseline.cyan());
        return Ok(());
    }

    println!("Revisions of {}:", baseline.cyan());
    for revision in &revisions {
        println!(
            "   {} {}  {}",
            format!("rev{}", revision.number).bold(),
            revision.date,
            revision.path.as_str().dimmed()
        );
    }
    Ok(())
}

/// Run the list command
pub fn run_list(root: &Path) -> Result<()> {
    let ws = open_workspace(root)?;
    let ids = ws.list_baselines()?;

    if ids.is_empty() {
        println!("No baselines in {}.", ws.baselines_dir().as_str().dimmed());
        return Ok(());
    }

    for id in &ids {
        let pending = regbase_core::Ledger::load(&ws.ledger_path(id)?)?.len();
        if pending > 0 {
            println!("   {} ({} staged)", id.cyan(), pending.to_string().yellow());
        } else {
            println!("   {}", id.cyan());
        }
    }
    Ok(())
}
