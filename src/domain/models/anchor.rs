//! Intent anchor: the single durable "north star" statement per user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Commitment tiers an anchor moves through. `Committed` is the penultimate
/// tier; promotion to `Anchored` is evidence-gated (see the stage promoter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStage {
    #[default]
    Exploring,
    Forming,
    Committed,
    Anchored,
}

impl CommitmentStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exploring => "exploring",
            Self::Forming => "forming",
            Self::Committed => "committed",
            Self::Anchored => "anchored",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "exploring" => Some(Self::Exploring),
            "forming" => Some(Self::Forming),
            "committed" => Some(Self::Committed),
            "anchored" => Some(Self::Anchored),
            _ => None,
        }
    }
}

/// The event that triggered an anchor write attempt. Only `Set` and `Reset`
/// may touch the store; everything else is a no-op by contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorEvent {
    Set,
    Reset,
    Mention,
    Drift,
}

impl AnchorEvent {
    /// True for the two events allowed to write.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Set | Self::Reset)
    }
}

/// A displaced anchor, retained in the bounded history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorHistoryEntry {
    pub anchor_text: String,
    pub recorded_at: DateTime<Utc>,
}

/// The durable anchor row. At most one current row per user; history is
/// append-only and capped (oldest dropped first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnchor {
    pub id: Uuid,
    pub user_id: String,
    /// Normalized, whitespace-collapsed statement.
    pub anchor_text: String,
    /// How strongly the statement was held when written, 0.0..=1.0.
    pub intent_strength: f64,
    /// Auxiliary level `y` (yearning), 0..=5.
    pub y_level: u8,
    /// Auxiliary level `h` (hesitation), 0..=5.
    pub h_level: u8,
    pub stage: CommitmentStage,
    pub history: Vec<AnchorHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntentAnchor {
    pub fn new(user_id: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            anchor_text: anchor_text.into(),
            intent_strength: 0.5,
            y_level: 0,
            h_level: 0,
            stage: CommitmentStage::default(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.intent_strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn with_levels(mut self, y_level: u8, h_level: u8) -> Self {
        self.y_level = y_level.min(5);
        self.h_level = h_level.min(5);
        self
    }

    pub fn with_stage(mut self, stage: CommitmentStage) -> Self {
        self.stage = stage;
        self
    }
}

/// Collapse whitespace runs and trim. Anchor identity is compared on this
/// normalized form; identical text after normalization is a no-op write.
pub fn normalize_anchor_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for anchor identity across representations.
///
/// Upstream callers hand the anchor either as a bare JSON string or as an
/// object carrying the statement under `anchor` or `text`. Both forms must
/// resolve to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnchorKey(String);

impl AnchorKey {
    pub fn from_text(text: &str) -> Self {
        Self(normalize_anchor_text(text).to_lowercase())
    }

    /// Resolve a bare string or object representation to a key. Returns
    /// None for shapes that carry no statement.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::from_text(s)),
            serde_json::Value::Object(map) => map
                .get("anchor")
                .or_else(|| map.get("text"))
                .and_then(|v| v.as_str())
                .map(Self::from_text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A caller-supplied write request carried alongside a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorDirective {
    pub event: AnchorEvent,
    pub candidate_text: String,
    pub strength: f64,
    pub y_level: u8,
    pub h_level: u8,
}
