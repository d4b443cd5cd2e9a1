//! Volatility classification types.

use serde::{Deserialize, Serialize};

/// Hysteresis-smoothed instability rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityRank {
    Low,
    Mid,
    High,
}

impl VolatilityRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "mid" => Some(Self::Mid),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Whether the next response should press on or pull back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Brake,
}

/// Coarse stability band supplied by upstream assessment, when available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityBand {
    Stable,
    Mixed,
    Unstable,
}

impl StabilityBand {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Some(Self::Stable),
            "mixed" => Some(Self::Mixed),
            "unstable" => Some(Self::Unstable),
            _ => None,
        }
    }
}

/// Response-shaping hint derived purely from the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Offer a single small next step.
    OneStep,
    /// Offer a choice between two directions.
    TwoChoice,
    /// Slow everything down before offering anything.
    SafetyBrake,
}

/// One turn's volatility verdict. `rank` is the only scalar that carries
/// memory across turns (it is fed back in as the previous rank); everything
/// else is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolatilityState {
    pub rank: VolatilityRank,
    pub direction: Direction,
    pub prompt_style: PromptStyle,
    /// High volatility is the moment to re-surface the user's north star.
    pub should_confirm_anchor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering() {
        assert!(VolatilityRank::Low < VolatilityRank::Mid);
        assert!(VolatilityRank::Mid < VolatilityRank::High);
    }

    #[test]
    fn test_rank_round_trip() {
        for rank in [VolatilityRank::Low, VolatilityRank::Mid, VolatilityRank::High] {
            assert_eq!(VolatilityRank::from_str(rank.as_str()), Some(rank));
        }
        assert_eq!(VolatilityRank::from_str("extreme"), None);
    }
}
