//! Intent anchor store: gating logic over the anchor repository.
//!
//! The store refuses to overwrite a user's north star with meta-commentary
//! or low-signal text. Writes are identity-scoped: an update targets the
//! specific existing row by id, never a bulk match on user, so concurrent
//! duplicate rows cannot be corrupted together.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    normalize_anchor_text, AnchorConfig, AnchorEvent, AnchorHistoryEntry, CommitmentStage,
    IntentAnchor,
};
use crate::domain::ports::AnchorRepository;

/// Engineering/debugging vocabulary: a candidate carrying it is talk about
/// the system, not a life intent.
const ENGINEERING_VOCAB: &[&str] = &[
    "debug", "bug", "test", "prompt", "token", "api", "server", "log", "error", "spec",
    "llm", "model", "deploy", "バグ", "テスト", "プロンプト", "実装", "デバッグ", "サーバ",
];

/// Conversation-about-the-conversation vocabulary.
const META_CONVERSATION_VOCAB: &[&str] = &[
    "this conversation",
    "your answer",
    "your response",
    "you said",
    "the chat",
    "この会話",
    "さっきの返事",
    "その返答",
    "この話の流れ",
    "チャット",
];

/// What an upsert attempt did, for audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorUpsertOutcome {
    /// A fresh anchor row was created.
    Created,
    /// The existing anchor was replaced; the old one moved to history.
    Updated,
    /// Candidate matched the current anchor after normalization; no-op.
    UnchangedIdentical,
    /// Candidate failed the meta-text filter; no-op.
    RejectedMeta,
    /// The triggering event is not a write event; no-op.
    IgnoredEvent,
}

/// Service over the anchor repository.
pub struct AnchorService<R: AnchorRepository> {
    repository: Arc<R>,
    config: AnchorConfig,
}

impl<R: AnchorRepository> AnchorService<R> {
    pub fn new(repository: Arc<R>, config: AnchorConfig) -> Self {
        Self { repository, config }
    }

    /// Load the user's current anchor, or None.
    pub async fn load(&self, user_id: &str) -> DomainResult<Option<IntentAnchor>> {
        self.repository.find_by_user(user_id).await
    }

    /// Attempt an anchor write. See the outcome enum for the no-op paths.
    pub async fn upsert(
        &self,
        user_id: &str,
        candidate_text: &str,
        strength: f64,
        y_level: u8,
        h_level: u8,
        event: AnchorEvent,
    ) -> DomainResult<AnchorUpsertOutcome> {
        if !event.is_write() {
            return Ok(AnchorUpsertOutcome::IgnoredEvent);
        }

        let normalized = normalize_anchor_text(candidate_text);
        if self.is_meta_text(&normalized) {
            debug!(user_id, "anchor candidate rejected by meta filter");
            return Ok(AnchorUpsertOutcome::RejectedMeta);
        }

        match self.repository.find_by_user(user_id).await? {
            None => {
                let anchor = IntentAnchor::new(user_id, normalized)
                    .with_strength(strength)
                    .with_levels(y_level, h_level);
                self.repository.insert(&anchor).await?;
                info!(user_id, "anchor created");
                Ok(AnchorUpsertOutcome::Created)
            }
            Some(mut existing) => {
                if existing.anchor_text == normalized {
                    // Identical text is a no-op, not a history-producing
                    // update; only the timestamp refreshes.
                    existing.updated_at = Utc::now();
                    self.repository.update_by_id(existing.id, &existing).await?;
                    return Ok(AnchorUpsertOutcome::UnchangedIdentical);
                }

                // The displaced anchor, not the new one, goes to history.
                existing.history.push(AnchorHistoryEntry {
                    anchor_text: existing.anchor_text.clone(),
                    recorded_at: existing.updated_at,
                });
                let overflow = existing.history.len().saturating_sub(self.config.history_cap);
                if overflow > 0 {
                    existing.history.drain(..overflow);
                }

                existing.anchor_text = normalized;
                existing.intent_strength = strength.clamp(0.0, 1.0);
                existing.y_level = y_level.min(5);
                existing.h_level = h_level.min(5);
                existing.updated_at = Utc::now();
                self.repository.update_by_id(existing.id, &existing).await?;
                info!(user_id, "anchor updated");
                Ok(AnchorUpsertOutcome::Updated)
            }
        }
    }

    /// Apply a granted stage promotion to the stored anchor.
    pub async fn apply_promotion(&self, user_id: &str) -> DomainResult<bool> {
        match self.repository.find_by_user(user_id).await? {
            Some(mut anchor) if anchor.stage == CommitmentStage::Committed => {
                anchor.stage = CommitmentStage::Anchored;
                anchor.updated_at = Utc::now();
                self.repository.update_by_id(anchor.id, &anchor).await?;
                info!(user_id, "anchor stage promoted to anchored");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Record an observed stage on the stored anchor (used as commitment
    /// develops below the promotion tier).
    pub async fn set_stage(&self, user_id: &str, stage: CommitmentStage) -> DomainResult<bool> {
        match self.repository.find_by_user(user_id).await? {
            Some(mut anchor) => {
                anchor.stage = stage;
                anchor.updated_at = Utc::now();
                self.repository.update_by_id(anchor.id, &anchor).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The meta-text filter: too short, engineering vocabulary, or
    /// conversation-about-the-conversation vocabulary.
    fn is_meta_text(&self, normalized: &str) -> bool {
        if normalized.chars().count() < self.config.min_chars {
            return true;
        }
        let lower = normalized.to_lowercase();
        ENGINEERING_VOCAB.iter().any(|w| lower.contains(w))
            || META_CONVERSATION_VOCAB.iter().any(|w| lower.contains(w))
    }
}
