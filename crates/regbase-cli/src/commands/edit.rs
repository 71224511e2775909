//! Stage, pending, commit and discard command implementations
//!
//! Every command opens an edit session, so two operators cannot change the
//! same baseline at once.

use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;

use regbase_core::{
    AuditSink, Change, EditSession, Entry, Identity, Ledger, PendingAction, ValueType,
};

use super::open_workspace;
use crate::cli::StageAction;
use crate::error::{CliError, Result};

/// Current value of an entry, including staged changes.
fn current_entry<A: AuditSink>(session: &EditSession<A>, path: &str, name: &str) -> Result<Entry> {
    let identity = Identity::new(path, name);
    session
        .preview_entries()
        .into_iter()
        .find(|e| e.identity() == identity)
        .ok_or_else(|| {
            CliError::user(format!(
                "No entry {}\\{} in baseline '{}'",
                path,
                name,
                session.id()
            ))
        })
}

fn print_actions(actions: &[PendingAction]) {
    for action in actions {
        let marker = match action {
            PendingAction::Add(_) => "+".green(),
            PendingAction::Edit(_) => "~".yellow(),
            PendingAction::Delete(_) => "-".red(),
        };
        println!("   {} {}", marker, action.describe());
    }
}

fn confirm(prompt: String) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// Run the stage command
pub fn run_stage(root: &Path, baseline: &str, action: StageAction) -> Result<()> {
    let ws = open_workspace(root)?;
    let mut session = ws.open_session(baseline, ws.audit_log())?;

    match action {
        StageAction::Add {
            path,
            name,
            data,
            value_type,
        } => {
            session.stage_add([Change::new(path, name, value_type, data)])?;
        }
        StageAction::Edit {
            path,
            name,
            data,
            value_type,
        } => {
            let current = current_entry(&session, &path, &name)?;
            let value_type = value_type.map(ValueType::from).unwrap_or(current.value_type);
            session.stage_edit([Change::new(path, name, value_type, data)])?;
        }
        StageAction::Delete { path, name } => {
            let current = current_entry(&session, &path, &name)?;
            session.stage_delete([Change::from(&current)])?;
        }
    }

    println!(
        "{} {} staged change(s) for {}:",
        "OK".green().bold(),
        session.pending().len(),
        baseline.cyan()
    );
    print_actions(session.pending());
    session.close();
    Ok(())
}

/// Run the pending command
///
/// Reads the ledger without taking the session lock.
pub fn run_pending(root: &Path, baseline: &str, json: bool) -> Result<()> {
    let ws = open_workspace(root)?;
    let ledger = Ledger::load(&ws.ledger_path(baseline)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(ledger.actions())?);
        return Ok(());
    }

    if ledger.is_empty() {
        println!("{} No staged changes for {}.", "OK".green().bold(), baseline.cyan());
    } else {
        println!("{} staged change(s) for {}:", ledger.len(), baseline.cyan());
        print_actions(ledger.actions());
    }
    Ok(())
}

/// Run the commit command
///
/// Backs up the current baseline as a new revision, then applies the
/// ledger. Actions that cannot be applied are listed and make the command
/// fail after the rest has been written.
pub fn run_commit(root: &Path, baseline: &str, yes: bool) -> Result<()> {
    let ws = open_workspace(root)?;
    let session = ws.open_session(baseline, ws.audit_log())?;

    if session.pending().is_empty() {
        println!(
            "{} No staged changes; a revision will still be recorded.",
            "NOTE".yellow().bold()
        );
    } else {
        println!("Changes to commit to {}:", baseline.cyan());
        print_actions(session.pending());
    }

    if !yes
        && !confirm(format!(
            "Commit {} change(s) to '{}'?",
            session.pending().len(),
            baseline
        ))?
    {
        session.close();
        return Err(CliError::user("Commit cancelled by user."));
    }

    let outcome = session.commit()?;
    println!(
        "{} Committed {} change(s) to {}. Previous version saved as revision {}.",
        "OK".green().bold(),
        outcome.applied.len(),
        baseline.cyan(),
        outcome.revision.number
    );

    if outcome.is_partial() {
        println!("{} Some changes could not be applied:", "PARTIAL".red().bold());
        for failed in &outcome.failed {
            println!("   {} {} ({})", "!".red(), failed.action.describe(), failed.reason);
        }
    }
    outcome.into_result()?;
    Ok(())
}

/// Run the discard command
pub fn run_discard(root: &Path, baseline: &str, yes: bool) -> Result<()> {
    let ws = open_workspace(root)?;
    let session = ws.open_session(baseline, ws.audit_log())?;

    if session.pending().is_empty() {
        println!("{} Nothing to discard for {}.", "OK".green().bold(), baseline.cyan());
        session.close();
        return Ok(());
    }

    if !yes
        && !confirm(format!(
            "Discard {} staged change(s) to '{}'?",
            session.pending().len(),
            baseline
        ))?
    {
        session.close();
        return Err(CliError::user("Discard cancelled by user."));
    }

    let discarded = session.discard()?;
    println!(
        "{} Discarded {} change(s) to {}:",
        "OK".green().bold(),
        discarded.len(),
        baseline.cyan()
    );
    print_actions(&discarded);
    Ok(())
}
