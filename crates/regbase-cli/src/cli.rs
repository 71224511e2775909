//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// regbase - Audit machines against golden registry baselines
#[derive(Parser, Debug)]
#[command(name = "regbase")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, env = "REGBASE_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List baselines in the workspace
    List,

    /// Reconcile a baseline against a live-state snapshot
    ///
    /// Shows entries that need attention unless --all is given.
    ///
    /// Examples:
    ///   regbase check MicroAOI -s snapshot.json
    ///   regbase check MicroAOI -s snapshot.json --all --json
    Check {
        /// Baseline id (machine type)
        baseline: String,

        /// Snapshot file of the live entries
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Only consider live entries under this key
        #[arg(long)]
        under: Option<String>,

        /// Show every baseline entry, not only those needing attention
        #[arg(long)]
        all: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show live entries and how they relate to the baseline
    Redundant {
        /// Baseline id (machine type)
        baseline: String,

        /// Snapshot file of the live entries
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Only consider live entries under this key
        #[arg(long)]
        under: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write baseline values into a snapshot for every Fail or Missing entry
    Fix {
        /// Baseline id (machine type)
        baseline: String,

        /// Snapshot file of the live entries
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Preview fixes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Stage a change to a baseline
    Stage {
        /// Baseline id (machine type)
        baseline: String,

        #[command(subcommand)]
        action: StageAction,
    },

    /// Show staged changes of a baseline
    Pending {
        /// Baseline id (machine type)
        baseline: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Commit staged changes, backing up the current baseline first
    Commit {
        /// Baseline id (machine type)
        baseline: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Drop staged changes, leaving the baseline untouched
    Discard {
        /// Baseline id (machine type)
        baseline: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List backup revisions of a baseline
    Revisions {
        /// Baseline id (machine type)
        baseline: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Staging actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum StageAction {
    /// Stage a new entry
    Add {
        /// Key path, e.g. HKLM\Software\Vendor
        path: String,

        /// Value name
        name: String,

        /// Value data
        #[arg(default_value = "")]
        data: String,

        /// Value type
        #[arg(short = 't', long = "type", default_value = "REG_SZ")]
        value_type: String,
    },

    /// Stage a new value for an existing entry
    Edit {
        /// Key path
        path: String,

        /// Value name
        name: String,

        /// New value data
        data: String,

        /// New value type (defaults to the current type)
        #[arg(short = 't', long = "type")]
        value_type: Option<String>,
    },

    /// Stage removal of an entry
    Delete {
        /// Key path
        path: String,

        /// Value name
        name: String,
    },
}
