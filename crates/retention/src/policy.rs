//! Retention policy configuration

use crate::tier::Tier;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which artifacts survive a cleanup run
///
/// Counts are unsigned; the constructors and the serde form accept signed
/// input and clamp negatives to 0, so building a policy never fails.
///
/// # Example
///
/// ```rust
/// use retention::RetentionPolicy;
///
/// let policy = RetentionPolicy::smart(7, 4, 12, -1);
/// assert_eq!(policy, RetentionPolicy::Smart { daily: 7, weekly: 4, monthly: 12, yearly: 0 });
/// assert_eq!(policy.to_string(), "smart:7,4,12,0");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep everything
    #[default]
    None,
    /// Keep the N most recent artifacts
    Simple {
        #[serde(deserialize_with = "clamped_count")]
        keep_count: u32,
    },
    /// Grandfather-father-son rotation with four independent tiers
    Smart {
        #[serde(default, deserialize_with = "clamped_count")]
        daily: u32,
        #[serde(default, deserialize_with = "clamped_count")]
        weekly: u32,
        #[serde(default, deserialize_with = "clamped_count")]
        monthly: u32,
        #[serde(default, deserialize_with = "clamped_count")]
        yearly: u32,
    },
}

impl RetentionPolicy {
    /// Keep the `keep_count` most recent artifacts
    pub fn simple(keep_count: i64) -> Self {
        Self::Simple {
            keep_count: clamp_count(keep_count),
        }
    }

    /// GVS rotation with the given per-tier slot counts
    pub fn smart(daily: i64, weekly: i64, monthly: i64, yearly: i64) -> Self {
        Self::Smart {
            daily: clamp_count(daily),
            weekly: clamp_count(weekly),
            monthly: clamp_count(monthly),
            yearly: clamp_count(yearly),
        }
    }

    /// Tiers with a non-zero slot count, in daily..yearly order
    ///
    /// Empty for anything but `Smart`.
    pub fn enabled_tiers(&self) -> impl Iterator<Item = (Tier, u32)> {
        let counts = match *self {
            Self::Smart {
                daily,
                weekly,
                monthly,
                yearly,
            } => [daily, weekly, monthly, yearly],
            _ => [0; 4],
        };

        Tier::ALL
            .into_iter()
            .zip(counts)
            .filter(|&(_, count)| count > 0)
    }

    /// Short name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Simple { .. } => "simple",
            Self::Smart { .. } => "smart",
        }
    }
}

/// Clamp a user-supplied count into the policy's range
pub fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn clamped_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_count)
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Simple { keep_count } => write!(f, "simple:{}", keep_count),
            Self::Smart {
                daily,
                weekly,
                monthly,
                yearly,
            } => write!(f, "smart:{},{},{},{}", daily, weekly, monthly, yearly),
        }
    }
}

/// Error parsing the text form of a policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyParseError {
    #[error("unknown policy kind '{0}' (expected none, simple or smart)")]
    UnknownKind(String),

    #[error("policy '{0}' needs a value, e.g. simple:7 or smart:7,4,12,1")]
    MissingValue(String),

    #[error("invalid count '{0}'")]
    InvalidCount(String),

    #[error("unknown tier '{0}' (expected daily, weekly, monthly or yearly)")]
    UnknownTier(String),

    #[error("smart policy takes at most 4 tier counts, got {0}")]
    TooManyTiers(usize),

    #[error("cannot mix positional and named tier counts")]
    MixedTierSyntax,
}

impl FromStr for RetentionPolicy {
    type Err = PolicyParseError;

    /// Parse `none`, `simple:N`, `smart:D,W,M,Y` or
    /// `smart:daily=D,weekly=W,...` (omitted tiers are 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (kind, value) = match s.split_once(':') {
            Some((kind, value)) => (kind.trim(), Some(value.trim())),
            None => (s.as_str(), None),
        };

        match kind {
            "none" | "keep-all" => Ok(Self::None),
            "simple" => {
                let value = value
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| PolicyParseError::MissingValue(kind.to_string()))?;
                Ok(Self::simple(parse_count(value)?))
            }
            "smart" | "gvs" => {
                let value = value
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| PolicyParseError::MissingValue(kind.to_string()))?;
                parse_tiers(value)
            }
            other => Err(PolicyParseError::UnknownKind(other.to_string())),
        }
    }
}

fn parse_count(value: &str) -> Result<i64, PolicyParseError> {
    let value = value.trim();
    value
        .parse::<i64>()
        .map_err(|_| PolicyParseError::InvalidCount(value.to_string()))
}

fn parse_tiers(value: &str) -> Result<RetentionPolicy, PolicyParseError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let named = parts.iter().filter(|p| p.contains('=')).count();

    let mut counts = [0i64; 4];
    if named == 0 {
        if parts.len() > counts.len() {
            return Err(PolicyParseError::TooManyTiers(parts.len()));
        }
        for (slot, part) in counts.iter_mut().zip(&parts) {
            *slot = parse_count(part)?;
        }
    } else if named == parts.len() {
        for part in parts {
            let (name, count) = part.split_once('=').unwrap_or((part, ""));
            let tier = Tier::from_name(name.trim())
                .ok_or_else(|| PolicyParseError::UnknownTier(name.trim().to_string()))?;
            counts[tier as usize] = parse_count(count)?;
        }
    } else {
        return Err(PolicyParseError::MixedTierSyntax);
    }

    let [daily, weekly, monthly, yearly] = counts;
    Ok(RetentionPolicy::smart(daily, weekly, monthly, yearly))
}
