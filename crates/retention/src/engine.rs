//! Keep/delete partitioning
//!
//! `evaluate` and `explain` share one decision pass, so a verdict shown to a
//! user always matches what a cleanup run would do.

use crate::anchor::resolve_anchor;
use crate::policy::RetentionPolicy;
use crate::tier::{fill_slots, Tier};
use crate::{Artifact, RetentionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Why an artifact survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum KeepReason {
    /// Policy keeps everything
    KeepAll,
    /// Among the newest artifacts (`rank` 0 is the newest)
    Recent { rank: usize },
    /// Winner of a tier window
    Slot { tier: Tier, slot: u32 },
}

/// Decision for a single artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub artifact: Artifact,
    pub keep: bool,
    pub reasons: Vec<KeepReason>,
}

/// Outcome of one decision pass over the deduplicated input
struct Decision<'a> {
    artifacts: Vec<&'a Artifact>,
    /// Presentation order for `evaluate`
    order: Vec<usize>,
    /// Keep reasons per artifact; empty means delete
    reasons: Vec<Vec<KeepReason>>,
}

/// Partition `artifacts` into the ones to keep and the ones to delete
///
/// Total over every input: an empty list yields an empty result, duplicate
/// identifiers after the first are ignored, and no policy can fail.
pub fn evaluate(artifacts: &[Artifact], policy: &RetentionPolicy) -> RetentionResult {
    let decision = decide(artifacts, policy);
    let mut result = RetentionResult::default();

    for &i in &decision.order {
        let artifact = decision.artifacts[i].clone();
        if decision.reasons[i].is_empty() {
            result.delete.push(artifact);
        } else {
            result.keep.push(artifact);
        }
    }

    result
}

/// Per-artifact verdicts in input order, with the reasons each kept one survives
pub fn explain(artifacts: &[Artifact], policy: &RetentionPolicy) -> Vec<Verdict> {
    let decision = decide(artifacts, policy);

    decision
        .artifacts
        .into_iter()
        .zip(decision.reasons)
        .map(|(artifact, reasons)| Verdict {
            artifact: artifact.clone(),
            keep: !reasons.is_empty(),
            reasons,
        })
        .collect()
}

fn decide<'a>(artifacts: &'a [Artifact], policy: &RetentionPolicy) -> Decision<'a> {
    let unique = dedup(artifacts);
    let mut reasons = vec![Vec::new(); unique.len()];
    let mut order: Vec<usize> = (0..unique.len()).collect();

    match *policy {
        RetentionPolicy::None => {
            for r in &mut reasons {
                r.push(KeepReason::KeepAll);
            }
        }
        RetentionPolicy::Simple { keep_count } => {
            // Stable sort: equal timestamps stay in input order
            order.sort_by(|&a, &b| unique[b].timestamp.cmp(&unique[a].timestamp));
            for (rank, &i) in order.iter().take(keep_count as usize).enumerate() {
                reasons[i].push(KeepReason::Recent { rank });
            }
        }
        RetentionPolicy::Smart { .. } => {
            if let Some(anchor) = resolve_anchor(unique.iter().copied()) {
                debug!("Retention anchor {} over {} artifacts", anchor, unique.len());

                for (tier, count) in policy.enabled_tiers() {
                    let slots = fill_slots(unique.iter().copied(), anchor, tier, count);
                    debug!("Tier {} filled {}/{} slots", tier, slots.len(), count);

                    for slot in slots {
                        reasons[slot.artifact].push(KeepReason::Slot {
                            tier,
                            slot: slot.index,
                        });
                    }
                }
            }
        }
    }

    Decision {
        artifacts: unique,
        order,
        reasons,
    }
}

/// First occurrence of each identifier, in input order
fn dedup(artifacts: &[Artifact]) -> Vec<&Artifact> {
    let mut seen = HashSet::with_capacity(artifacts.len());
    let mut unique = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        if seen.insert(artifact.id.as_str()) {
            unique.push(artifact);
        } else {
            warn!("Ignoring duplicate artifact identifier: {}", artifact.id);
        }
    }

    unique
}
