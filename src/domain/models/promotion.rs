//! Stage promotion evidence and decision types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fresh repetition evidence for a promotion attempt. Ephemeral input; this
/// core never persists it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PromotionEvidence {
    /// How many times the same anchor key has recurred.
    pub repeat_count: u32,
    /// When the prior promotion-relevant record was written, if any.
    pub last_recorded_at: Option<DateTime<Utc>>,
    /// The clock for the attempt, injected so the decision stays pure.
    pub now: DateTime<Utc>,
}

/// Why a promotion attempt did not promote. Promotion is binary but its
/// rejection reason must always be inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionBlock {
    NotCommitAction,
    WrongStage,
    AnchorMismatch,
    NoRepeatEvidence,
    TooSoon,
    EvidenceStale,
}

impl PromotionBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotCommitAction => "NOT_COMMIT_ACTION",
            Self::WrongStage => "WRONG_STAGE",
            Self::AnchorMismatch => "ANCHOR_MISMATCH",
            Self::NoRepeatEvidence => "NO_REPEAT_EVIDENCE",
            Self::TooSoon => "TOO_SOON",
            Self::EvidenceStale => "EVIDENCE_STALE",
        }
    }
}

/// Structured promotion verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionDecision {
    pub upgrade: bool,
    /// Present exactly when `upgrade` is false.
    pub blocked_by: Option<PromotionBlock>,
}

impl PromotionDecision {
    pub fn promoted() -> Self {
        Self {
            upgrade: true,
            blocked_by: None,
        }
    }

    pub fn blocked(reason: PromotionBlock) -> Self {
        Self {
            upgrade: false,
            blocked_by: Some(reason),
        }
    }
}
