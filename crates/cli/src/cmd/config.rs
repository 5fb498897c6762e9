//! Configuration management command
//!
//! Provides CLI interface to view and edit system configuration.

use crate::system_config::{self, KEYS};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use retention::RetentionPolicy;

/// List all configuration values
pub async fn run_list() -> Result<()> {
    let config = system_config::load()?;
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    println!("{}", "System Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    println!("{}", "[storage]".yellow());
    println!(
        "  {} = {}",
        "backup_dir".cyan(),
        config.storage.backup_dir.display()
    );

    println!("\n{}", "[retention]".yellow());
    println!(
        "  {} = {} {}",
        "policy".cyan(),
        config.retention,
        describe_policy(&config.retention).dimmed()
    );
    if config.retention_is_fallback() {
        println!(
            "  {}",
            "[retention] could not be understood and is left as written; fix it with 'keeper config set retention.policy'"
                .yellow()
        );
    }

    println!("\n{}", "[prune]".yellow());
    println!(
        "  {} = {}",
        "parallelism".cyan(),
        config.prune.parallelism
    );

    println!("\n{}", "Valid Values:".bold());
    println!("  retention.policy: none | simple:N | smart:DAILY,WEEKLY,MONTHLY,YEARLY");
    println!("  prune.parallelism: 1-64");

    Ok(())
}

/// Get a single configuration value
pub async fn run_get(key: &str) -> Result<()> {
    let config = system_config::load()?;

    let value = config.get(key).with_context(|| {
        format!(
            "Unknown config key: {}. Available keys: {}",
            key,
            KEYS.join(", ")
        )
    })?;

    println!("{}", value);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = system_config::load()?;

    config
        .set(key, value)
        .context("Invalid configuration value")?;

    system_config::save(&config)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(create: bool) -> Result<()> {
    let config_path = system_config::config_file_path()
        .context("Could not determine config file path")?;

    if create && !config_path.exists() {
        system_config::init_if_missing()?;
        println!("{} Created config file at: {}", "✓".green(), config_path.display());
    } else if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{}", config_path.display());
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}

fn describe_policy(policy: &RetentionPolicy) -> String {
    match *policy {
        RetentionPolicy::None => "(keep everything)".to_string(),
        RetentionPolicy::Simple { keep_count } => format!("(keep the {} newest)", keep_count),
        RetentionPolicy::Smart {
            daily,
            weekly,
            monthly,
            yearly,
        } => format!(
            "({} daily, {} weekly, {} monthly, {} yearly)",
            daily, weekly, monthly, yearly
        ),
    }
}
