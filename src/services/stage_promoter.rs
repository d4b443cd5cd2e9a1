//! Evidence-based stage promotion: the gate between `Committed` and
//! `Anchored`.
//!
//! Promotion is deliberately hard to earn. Every condition must hold at
//! once; any single failure produces a structured non-promotion carrying a
//! machine-readable reason so that audit logs can always say why a
//! promotion did not happen.

use chrono::Duration;
use tracing::debug;

use crate::domain::models::{
    AnchorEvent, AnchorKey, CommitmentStage, PromotionBlock, PromotionConfig, PromotionDecision,
    PromotionEvidence,
};

/// Decide whether the anchor stage may be promoted to its highest tier.
///
/// `current_key` is the key of the anchor being committed this turn;
/// `previous_key` is the key of the stored anchor, when one exists.
pub fn decide_promotion(
    action: AnchorEvent,
    stage: CommitmentStage,
    current_key: &AnchorKey,
    previous_key: Option<&AnchorKey>,
    evidence: &PromotionEvidence,
    config: &PromotionConfig,
) -> PromotionDecision {
    if action != AnchorEvent::Set {
        return PromotionDecision::blocked(PromotionBlock::NotCommitAction);
    }

    if stage != CommitmentStage::Committed {
        return PromotionDecision::blocked(PromotionBlock::WrongStage);
    }

    if let Some(previous) = previous_key {
        if previous != current_key {
            return PromotionDecision::blocked(PromotionBlock::AnchorMismatch);
        }
    }

    if evidence.repeat_count < config.min_repeats {
        return PromotionDecision::blocked(PromotionBlock::NoRepeatEvidence);
    }

    if let Some(last) = evidence.last_recorded_at {
        let elapsed = evidence.now.signed_duration_since(last);
        if elapsed < Duration::hours(config.min_spacing_hours) {
            return PromotionDecision::blocked(PromotionBlock::TooSoon);
        }
        if elapsed > Duration::days(config.max_window_days) {
            return PromotionDecision::blocked(PromotionBlock::EvidenceStale);
        }
    }

    debug!(repeats = evidence.repeat_count, "anchor stage promoted");
    PromotionDecision::promoted()
}
