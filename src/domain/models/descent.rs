//! Descent gate state: whether the agent should shift into a supportive
//! holding mode.

use serde::{Deserialize, Serialize};

/// Tri-state gate with asymmetric hysteresis. Entering requires a higher
/// composite risk than staying; a single mid-risk turn after opening must
/// not close it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescentGate {
    /// Normal conversation; no holding mode.
    #[default]
    Closed,
    /// The gate just opened this turn; holding mode is being offered.
    Offered,
    /// Holding mode is active and sticky.
    Accepted,
}

impl DescentGate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Offered => "offered",
            Self::Accepted => "accepted",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "closed" => Some(Self::Closed),
            "offered" => Some(Self::Offered),
            "accepted" => Some(Self::Accepted),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Offered | Self::Accepted)
    }
}

/// Optional goal orientation for the turn; nudges the composite risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Going deeper into the current material.
    Deepening,
    /// Holding the current level.
    Maintain,
    /// Moving forward/outward.
    Expansion,
}

/// Gate verdict plus the composite score that produced it, kept for audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescentDecision {
    pub gate: DescentGate,
    pub risk_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_states() {
        assert!(!DescentGate::Closed.is_open());
        assert!(DescentGate::Offered.is_open());
        assert!(DescentGate::Accepted.is_open());
    }

    #[test]
    fn test_round_trip() {
        for gate in [DescentGate::Closed, DescentGate::Offered, DescentGate::Accepted] {
            assert_eq!(DescentGate::from_str(gate.as_str()), Some(gate));
        }
    }
}
