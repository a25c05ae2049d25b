use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use colored::Colorize;

use chronicle_diff::{ContentLine, ExtractedDataDiff, FileDiff, FileDiffPayload};
use chronicle_providers::{DirectoryProvider, PollConfig};
use chronicle_sdk::{Acquisition, Chronicle, CommitRef, FileChronicle, ObjectId};

use crate::cli::*;
use crate::config::Config;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    let vault_dir = config.vault_dir(cli.vault);

    match cli.command {
        Command::Init(args) => cmd_init(args.path.unwrap_or(vault_dir)),
        Command::Status(_) => cmd_status(&open_vault(&vault_dir)?),
        Command::Log(args) => cmd_log(&open_vault(&vault_dir)?, args),
        Command::Diff(args) => cmd_diff(&open_vault(&vault_dir)?, args),
        Command::Import(args) => cmd_import(&open_vault(&vault_dir)?, &config, args).await,
    }
}

fn open_vault(dir: &Path) -> anyhow::Result<FileChronicle> {
    Chronicle::open(dir).with_context(|| format!("opening vault at {}", dir.display()))
}

fn cmd_init(path: PathBuf) -> anyhow::Result<()> {
    Chronicle::open(&path)?;
    println!(
        "{} Initialized empty vault in {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    Ok(())
}

fn cmd_status(vault: &FileChronicle) -> anyhow::Result<()> {
    match vault.head()? {
        Some(head) => {
            let log = vault.log()?;
            println!("Head: {}", head.short_hex().yellow().bold());
            println!("Commits: {}", log.len().to_string().bold());
            if let Some(latest) = log.first() {
                println!(
                    "Latest: {} from {} at {}",
                    latest.message,
                    latest.provider.cyan(),
                    latest.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed()
                );
            }
        }
        None => println!("Empty vault. Run {} to add data.", "chronicle import".bold()),
    }
    Ok(())
}

fn cmd_log(vault: &FileChronicle, args: LogArgs) -> anyhow::Result<()> {
    let entries = vault.log()?;
    if entries.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    for entry in entries.iter().take(args.limit) {
        let id = match entry.id {
            Some(id) => id.short_hex().yellow(),
            None => "pending".red().bold(),
        };
        println!(
            "{}  {}  {}  {}",
            id,
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            entry.provider.cyan(),
            entry.message
        );
    }
    Ok(())
}

fn cmd_diff(vault: &FileChronicle, args: DiffArgs) -> anyhow::Result<()> {
    let id = match args.commit {
        Some(prefix) => resolve_commit(vault, &prefix)?,
        None => vault
            .head()?
            .context("empty vault: nothing to diff")?,
    };

    if args.files {
        for diff in vault.file_diffs(CommitRef::Commit(id))? {
            print_file_diff(&diff);
        }
    }
    print_record_diff(&vault.diff(CommitRef::Commit(id))?);
    Ok(())
}

async fn cmd_import(
    vault: &FileChronicle,
    config: &Config,
    args: ImportArgs,
) -> anyhow::Result<()> {
    let message = args
        .message
        .unwrap_or_else(|| format!("{} import", args.provider));
    let poll = PollConfig {
        interval: Duration::from_secs(config.poll_interval_secs.unwrap_or(60)),
    };
    let provider = DirectoryProvider::new(&args.provider, &args.path);

    let outcome = vault.acquire(provider, &message, poll).await?;
    let Acquisition::Staged(_) = outcome else {
        bail!("import was cancelled");
    };

    print_record_diff(&vault.diff(CommitRef::Pending)?);

    if args.dry_run {
        vault.discard()?;
        println!("{} Dry run: nothing committed.", "✓".green());
    } else {
        let id = vault.promote()?;
        println!(
            "{} Committed {} as {}",
            "✓".green().bold(),
            args.provider.cyan(),
            id.short_hex().yellow().bold()
        );
    }
    Ok(())
}

/// Resolve a full or prefix hex id against the commit history.
fn resolve_commit(vault: &FileChronicle, prefix: &str) -> anyhow::Result<ObjectId> {
    let matches: Vec<ObjectId> = vault
        .log()?
        .iter()
        .filter_map(|entry| entry.id)
        .filter(|id| id.to_hex().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no commit matches '{prefix}'"),
        _ => bail!("'{prefix}' is ambiguous ({} matches)", matches.len()),
    }
}

fn print_record_diff(diff: &ExtractedDataDiff) {
    if diff.is_empty() {
        println!("No record changes.");
        return;
    }
    println!(
        "{} added, {} updated, {} deleted",
        diff.added.len().to_string().green().bold(),
        diff.updated.len().to_string().yellow().bold(),
        diff.deleted.len().to_string().red().bold()
    );
    for record in &diff.added {
        println!("  {} {} {}", "+".green(), record.data_type.bold(), record.key);
    }
    for record in &diff.updated {
        println!("  {} {} {}", "~".yellow(), record.data_type.bold(), record.key);
    }
    for record in &diff.deleted {
        println!("  {} {} {}", "-".red(), record.data_type.bold(), record.key);
    }
}

fn print_file_diff(diff: &FileDiff) {
    println!("{}", diff.filepath.bold());
    match &diff.payload {
        FileDiffPayload::Records(records) => {
            println!(
                "  {} added, {} updated, {} deleted records",
                records.added.len(),
                records.updated.len(),
                records.deleted.len()
            );
        }
        FileDiffPayload::Content(content) => {
            for hunk in &content.hunks {
                println!(
                    "  {}",
                    format!("@@ -{} +{} @@", hunk.old_start, hunk.new_start).dimmed()
                );
                for line in &hunk.lines {
                    match line {
                        ContentLine::Context(text) => println!("   {text}"),
                        ContentLine::Added(text) => println!("  {}", format!("+{text}").green()),
                        ContentLine::Removed(text) => println!("  {}", format!("-{text}").red()),
                    }
                }
            }
        }
    }
}
