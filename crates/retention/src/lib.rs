//! Backup retention decisions
//!
//! This crate provides:
//! - Artifact and result value types
//! - Retention policies (none, simple count, grandfather-father-son tiers)
//! - Anchor resolution from the artifact set itself
//! - Tier slot filling over fixed-width time windows
//! - The keep/delete partition and per-artifact explanations
//!
//! Everything here is pure: no I/O, no wall clock, no shared state.

pub mod anchor;
pub mod artifact;
pub mod engine;
pub mod policy;
pub mod tier;

// Re-exports
pub use anchor::resolve_anchor;
pub use artifact::{Artifact, RetentionResult};
pub use engine::{evaluate, explain, KeepReason, Verdict};
pub use policy::{PolicyParseError, RetentionPolicy};
pub use tier::Tier;
