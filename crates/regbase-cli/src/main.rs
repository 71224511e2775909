//! regbase CLI
//!
//! Audits machines against golden registry baselines and edits baselines
//! through a staged, revisioned workflow.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::Path;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to set up logging: {}", e)))?;
    tracing::debug!(?cli, "parsed arguments");

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Some(cmd) => execute_command(&root, cmd),
        None => {
            // No command provided - show help hint
            println!("{} golden baseline auditing", "regbase".green().bold());
            println!();
            println!("Run {} for available commands.", "regbase --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(root: &Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List => commands::run_list(root),
        Commands::Check {
            baseline,
            snapshot,
            under,
            all,
            json,
        } => commands::run_check(root, &baseline, &snapshot, under.as_deref(), all, json),
        Commands::Redundant {
            baseline,
            snapshot,
            under,
            json,
        } => commands::run_redundant(root, &baseline, &snapshot, under.as_deref(), json),
        Commands::Fix {
            baseline,
            snapshot,
            dry_run,
        } => commands::run_fix(root, &baseline, &snapshot, dry_run),
        Commands::Stage { baseline, action } => commands::run_stage(root, &baseline, action),
        Commands::Pending { baseline, json } => commands::run_pending(root, &baseline, json),
        Commands::Commit { baseline, yes } => commands::run_commit(root, &baseline, yes),
        Commands::Discard { baseline, yes } => commands::run_discard(root, &baseline, yes),
        Commands::Revisions { baseline, json } => commands::run_revisions(root, &baseline, json),
    }
}
