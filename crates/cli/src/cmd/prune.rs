//! Delete the backups a retention policy does not keep

use super::Target;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::PathBuf;
use storage::Pruner;

pub async fn run(
    dir: Option<PathBuf>,
    policy: Option<String>,
    dry_run: bool,
    yes: bool,
    parallelism: Option<usize>,
) -> Result<()> {
    let target = Target::resolve(dir, policy.as_deref())?;
    let artifacts = target.artifacts().await?;
    let result = retention::evaluate(&artifacts, &target.policy);

    println!(
        "{} {} backups in {} (policy {})",
        "Pruning".bold(),
        artifacts.len(),
        target.storage.dir().display(),
        target.policy.to_string().cyan()
    );
    println!();

    if result.is_noop() {
        println!("{}", "Nothing to delete - all backups are retained".dimmed());
        return Ok(());
    }

    for artifact in &result.delete {
        println!(
            "  {} {} {}",
            "-".red(),
            artifact.id,
            format!("({})", util::format_size(artifact.size_bytes)).dimmed()
        );
    }
    println!();
    println!(
        "{} to delete, {} kept, {} to reclaim",
        result.delete.len().to_string().yellow(),
        result.keep.len().to_string().green(),
        util::format_size(result.reclaimed_bytes())
    );

    if dry_run {
        println!("{}", "Dry run - nothing deleted".yellow());
        return Ok(());
    }

    if !yes && !confirm(&format!("Delete {} backups?", result.delete.len()))? {
        println!("{}", "Aborted - nothing deleted".yellow());
        return Ok(());
    }

    let pruner = Pruner::new(parallelism.unwrap_or(target.config.prune.parallelism));
    let report = pruner.prune(&target.storage, &result.delete).await;

    println!();
    println!("{}", "Prune Complete".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Backups deleted: {}", report.deleted.len().to_string().yellow());
    println!(
        "Space freed:     {}",
        util::format_size(report.bytes_freed).green()
    );

    // Failed deletions leave the kept set intact, so they warn rather than fail the run
    if !report.is_clean() {
        println!();
        println!(
            "{} {} deletions failed:",
            "Warning:".yellow().bold(),
            report.failed.len()
        );
        for failure in &report.failed {
            println!("  {} {}: {}", "!".yellow(), failure.id, failure.error.dimmed());
        }
    }

    Ok(())
}

/// Ask a yes/no question on stdin; anything but y/yes is no
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
