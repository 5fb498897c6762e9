//! Shared utilities for CLI commands

use chrono::{DateTime, Duration, Utc};
use retention::KeepReason;

/// Format timestamp as absolute time ("2024-01-03 14:30:00")
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format an age as relative time ("2 hours ago")
pub fn format_age(age: Duration) -> String {
    let seconds = age.num_seconds();

    if seconds < 0 {
        "in the future".to_string()
    } else if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Compact list of keep reasons ("daily#0 weekly#0")
pub fn format_reasons(reasons: &[KeepReason]) -> String {
    reasons
        .iter()
        .map(|reason| match reason {
            KeepReason::KeepAll => "keep-all".to_string(),
            KeepReason::Recent { rank } => format!("newest#{}", rank),
            KeepReason::Slot { tier, slot } => format!("{}#{}", tier, slot),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
