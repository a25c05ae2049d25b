use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chronicle",
    about = "chronicle — versioned vault for your personal data",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Vault directory (overrides chronicle.toml).
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new vault
    Init(InitArgs),
    /// Show the vault head and history summary
    Status(StatusArgs),
    /// Show commit history, newest first
    Log(LogArgs),
    /// Show the record diff a commit introduced
    Diff(DiffArgs),
    /// Import a downloaded export directory as a new commit
    Import(ImportArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Commit id (or unique hex prefix); defaults to the head commit.
    pub commit: Option<String>,
    /// Show per-file detail including content diffs for non-record files.
    #[arg(long)]
    pub files: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Provider key the data belongs to (e.g. "spotify").
    pub provider: String,
    /// Directory holding the unpacked export.
    pub path: PathBuf,
    #[arg(short, long)]
    pub message: Option<String>,
    /// Stage, print the diff, and discard instead of committing.
    #[arg(long)]
    pub dry_run: bool,
}
