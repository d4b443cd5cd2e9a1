//! Topic memory manager: upserts per-topic rows and runs the bounded
//! eviction pass.
//!
//! Eviction is "forget the notes, keep the fact we talked about it": only
//! `memo_summary` is cleared, only on non-core rows, and only for the
//! least-recently-used, lowest-hit-count overflow beyond the per-user cap.
//! Rows are never deleted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{TopicConfig, TopicObservation, TopicRecord};
use crate::domain::ports::TopicRepository;

/// Service over the topic repository.
pub struct TopicMemoryService<R: TopicRepository> {
    repository: Arc<R>,
    config: TopicConfig,
}

impl<R: TopicRepository> TopicMemoryService<R> {
    pub fn new(repository: Arc<R>, config: TopicConfig) -> Self {
        Self { repository, config }
    }

    /// Upsert one topic observation, then run the cleanup pass.
    pub async fn upsert(
        &self,
        user_id: &str,
        topic_key: &str,
        observation: TopicObservation,
    ) -> DomainResult<TopicRecord> {
        let record = match self.repository.find(user_id, topic_key).await? {
            None => {
                let mut record = TopicRecord::new(user_id, topic_key);
                apply_observation(&mut record, &observation);
                self.repository.insert(&record).await?;
                info!(user_id, topic_key, "topic created");
                record
            }
            Some(mut record) => {
                record.hit_count += 1;
                record.last_used_at = Utc::now();
                record.updated_at = record.last_used_at;
                apply_observation(&mut record, &observation);
                self.repository.update_by_id(record.id, &record).await?;
                debug!(user_id, topic_key, hits = record.hit_count, "topic refreshed");
                record
            }
        };

        self.cleanup(user_id).await?;
        Ok(record)
    }

    /// Clear memos on overflow rows. The repository returns non-core rows
    /// ordered `(last_used_at asc, hit_count asc)`, so the front of the list
    /// is exactly the eviction order.
    async fn cleanup(&self, user_id: &str) -> DomainResult<()> {
        let non_core = self.repository.list_non_core_by_user(user_id).await?;
        let overflow = non_core.len().saturating_sub(self.config.memo_cap);
        if overflow == 0 {
            return Ok(());
        }

        for record in non_core.into_iter().take(overflow) {
            if record.memo_summary.is_some() {
                self.repository.clear_memo(record.id).await?;
                info!(user_id, topic_key = %record.topic_key, "topic memo cleared");
            }
        }
        Ok(())
    }
}

/// Fold the observed fields into the row. Importance is preserved unless a
/// hint is supplied; an absent memo leaves the stored memo alone.
fn apply_observation(record: &mut TopicRecord, observation: &TopicObservation) {
    if let Some(q_code) = observation.q_code {
        record.last_q_code = Some(q_code);
    }
    if let Some(depth) = observation.depth {
        record.last_depth = Some(depth);
    }
    if let Some(phase) = observation.phase {
        record.last_phase = Some(phase);
    }
    if let Some(memo) = &observation.memo_summary {
        record.memo_summary = Some(memo.clone());
    }
    if let Some(importance) = observation.importance_hint {
        record.importance = importance;
    }
}
