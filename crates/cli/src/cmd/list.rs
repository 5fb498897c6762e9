//! List backups in the backup directory

use super::Target;
use crate::util;
use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(dir: Option<PathBuf>) -> Result<()> {
    let target = Target::resolve(dir, None)?;
    let mut artifacts = target.artifacts().await?;

    // Newest first
    artifacts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    println!(
        "{} {}",
        "Backups in".bold(),
        target.storage.dir().display()
    );
    println!();

    if artifacts.is_empty() {
        println!("{}", "No backups found".dimmed());
        return Ok(());
    }

    let now = Utc::now();
    for artifact in &artifacts {
        println!(
            "  {}  {:>10}  {} {}",
            util::format_timestamp(artifact.timestamp).cyan(),
            util::format_size(artifact.size_bytes),
            artifact.id,
            format!("({})", util::format_age(now - artifact.timestamp)).dimmed()
        );
    }

    let total: u64 = artifacts.iter().map(|a| a.size_bytes).sum();
    println!();
    println!(
        "{} backups, {}",
        artifacts.len().to_string().yellow(),
        util::format_size(total)
    );

    Ok(())
}
