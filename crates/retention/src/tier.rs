//! Rotation tiers and slot filling
//!
//! A tier with `count` slots splits the time before the anchor into `count`
//! consecutive windows of fixed width. Slot `i` holds the artifacts whose age
//! relative to the anchor lies in `[i * width, (i + 1) * width)`, so the anchor
//! itself always lands in slot 0. Each filled slot keeps exactly one artifact:
//! the newest one inside it.

use crate::Artifact;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One granularity level of a GVS rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Daily = 0,
    Weekly = 1,
    Monthly = 2,
    Yearly = 3,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Daily, Tier::Weekly, Tier::Monthly, Tier::Yearly];

    /// Fixed window width; calendar irregularities are ignored
    pub fn window(self) -> Duration {
        match self {
            Tier::Daily => Duration::days(1),
            Tier::Weekly => Duration::days(7),
            Tier::Monthly => Duration::days(30),
            Tier::Yearly => Duration::days(365),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Daily => "daily",
            Tier::Weekly => "weekly",
            Tier::Monthly => "monthly",
            Tier::Yearly => "yearly",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A filled slot: window index and the position of its winner in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: u32,
    pub artifact: usize,
}

/// Pick the newest artifact in each of the first `count` windows of `tier`
///
/// Artifacts newer than `anchor` belong to no window. On equal timestamps the
/// earlier artifact in iteration order wins. Returned slots are sorted by
/// window index; empty windows are simply absent.
pub fn fill_slots<'a, I>(artifacts: I, anchor: DateTime<Utc>, tier: Tier, count: u32) -> Vec<Slot>
where
    I: IntoIterator<Item = &'a Artifact>,
{
    if count == 0 {
        return Vec::new();
    }

    let width_ms = tier.window().num_milliseconds();
    // slot index -> (artifact position, timestamp)
    let mut winners: BTreeMap<u32, (usize, DateTime<Utc>)> = BTreeMap::new();

    for (position, artifact) in artifacts.into_iter().enumerate() {
        let age_ms = (anchor - artifact.timestamp).num_milliseconds();
        if age_ms < 0 {
            continue;
        }

        let index = match u32::try_from(age_ms / width_ms) {
            Ok(index) if index < count => index,
            _ => continue,
        };

        winners
            .entry(index)
            .and_modify(|winner| {
                if artifact.timestamp > winner.1 {
                    *winner = (position, artifact.timestamp);
                }
            })
            .or_insert((position, artifact.timestamp));
    }

    winners
        .into_iter()
        .map(|(index, (artifact, _))| Slot { index, artifact })
        .collect()
}
