//! Topic memory: bounded, importance-tiered per-user notes about recurring
//! conversation subjects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::{DepthStage, Phase, QCode};

/// Importance tier of a topic. `Core` rows are never evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicImportance {
    Core,
    Important,
    #[default]
    Casual,
}

impl TopicImportance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Important => "important",
            Self::Casual => "casual",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "core" => Some(Self::Core),
            "important" => Some(Self::Important),
            "casual" => Some(Self::Casual),
            _ => None,
        }
    }
}

/// One durable topic row, keyed by `(user_id, topic_key)`.
///
/// Eviction clears `memo_summary` only; the row itself (and the fact the
/// topic was discussed) survives indefinitely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: Uuid,
    pub user_id: String,
    pub topic_key: String,
    pub importance: TopicImportance,
    /// Monotonic increment, never reset.
    pub hit_count: i64,
    pub last_used_at: DateTime<Utc>,
    /// Free-text notes; the only field eviction may clear.
    pub memo_summary: Option<String>,
    pub last_q_code: Option<QCode>,
    pub last_depth: Option<DepthStage>,
    pub last_phase: Option<Phase>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TopicRecord {
    pub fn new(user_id: impl Into<String>, topic_key: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            topic_key: topic_key.into(),
            importance: TopicImportance::default(),
            hit_count: 1,
            last_used_at: now,
            memo_summary: None,
            last_q_code: None,
            last_depth: None,
            last_phase: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_importance(mut self, importance: TopicImportance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo_summary = Some(memo.into());
        self
    }
}

/// Fields observed about a topic during one turn, applied on upsert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicObservation {
    pub q_code: Option<QCode>,
    pub depth: Option<DepthStage>,
    pub phase: Option<Phase>,
    /// Replaces the memo when present; absent leaves the memo alone.
    pub memo_summary: Option<String>,
    /// Overrides stored importance when present.
    pub importance_hint: Option<TopicImportance>,
}
