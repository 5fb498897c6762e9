//! Reference point for window math
//!
//! The anchor is the timestamp of the newest artifact, never the wall clock.
//! A cleanup run that starts late, or is replayed later, makes the same
//! decisions as long as the artifact set is unchanged.

use crate::Artifact;
use chrono::{DateTime, Utc};

/// Timestamp of the newest artifact, or `None` for an empty set
pub fn resolve_anchor<'a, I>(artifacts: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = &'a Artifact>,
{
    artifacts.into_iter().map(|a| a.timestamp).max()
}
