//! Show what a prune would keep and delete

use super::Target;
use crate::util;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use retention::{resolve_anchor, Artifact, RetentionResult, Verdict};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Machine-readable plan (`--json`)
#[derive(Serialize)]
struct PlanOutput<'a> {
    backup_dir: &'a Path,
    policy: String,
    anchor: Option<DateTime<Utc>>,
    keep: &'a [Artifact],
    delete: &'a [Artifact],
    kept_bytes: u64,
    reclaimed_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdicts: Option<&'a [Verdict]>,
}

pub async fn run(
    dir: Option<PathBuf>,
    policy: Option<String>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let target = Target::resolve(dir, policy.as_deref())?;
    let artifacts = target.artifacts().await?;

    let result = retention::evaluate(&artifacts, &target.policy);
    let verdicts = explain.then(|| retention::explain(&artifacts, &target.policy));
    let anchor = resolve_anchor(&artifacts);

    if json {
        let output = PlanOutput {
            backup_dir: target.storage.dir(),
            policy: target.policy.to_string(),
            anchor,
            keep: &result.keep,
            delete: &result.delete,
            kept_bytes: result.kept_bytes(),
            reclaimed_bytes: result.reclaimed_bytes(),
            verdicts: verdicts.as_deref(),
        };
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize plan")?;
        println!("{}", text);
        return Ok(());
    }

    println!(
        "{} {}",
        "Retention plan for".bold(),
        target.storage.dir().display()
    );
    println!("{}: {}", "Policy".dimmed(), target.policy.to_string().cyan());
    if let Some(anchor) = anchor {
        println!("{}: {}", "Anchor".dimmed(), util::format_timestamp(anchor));
    }
    println!();

    match &verdicts {
        Some(verdicts) => print_verdicts(verdicts),
        None => print_partition(&result),
    }

    println!();
    print_summary(&result);
    Ok(())
}

fn print_partition(result: &RetentionResult) {
    for artifact in &result.keep {
        println!(
            "  {} {}  {}",
            "KEEP  ".green(),
            util::format_timestamp(artifact.timestamp).dimmed(),
            artifact.id
        );
    }
    for artifact in &result.delete {
        println!(
            "  {} {}  {}",
            "DELETE".red(),
            util::format_timestamp(artifact.timestamp).dimmed(),
            artifact.id
        );
    }
}

fn print_verdicts(verdicts: &[Verdict]) {
    for verdict in verdicts {
        let artifact = &verdict.artifact;
        if verdict.keep {
            println!(
                "  {} {}  {}  {}",
                "KEEP  ".green(),
                util::format_timestamp(artifact.timestamp).dimmed(),
                artifact.id,
                util::format_reasons(&verdict.reasons).cyan()
            );
        } else {
            println!(
                "  {} {}  {}",
                "DELETE".red(),
                util::format_timestamp(artifact.timestamp).dimmed(),
                artifact.id
            );
        }
    }
}

fn print_summary(result: &RetentionResult) {
    if result.keep.is_empty() && result.delete.is_empty() {
        println!("{}", "No backups found".dimmed());
        return;
    }

    println!(
        "Keep:   {} ({})",
        result.keep.len().to_string().green(),
        util::format_size(result.kept_bytes())
    );
    println!(
        "Delete: {} ({})",
        result.delete.len().to_string().yellow(),
        util::format_size(result.reclaimed_bytes())
    );
}
