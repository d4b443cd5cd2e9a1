use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::TopicRecord;

/// Repository trait for per-user, per-topic memory rows.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Load the row for `(user_id, topic_key)`, or None.
    async fn find(&self, user_id: &str, topic_key: &str) -> DomainResult<Option<TopicRecord>>;

    /// Insert a fresh topic row.
    async fn insert(&self, record: &TopicRecord) -> DomainResult<()>;

    /// Patch the row with the given id.
    async fn update_by_id(&self, id: Uuid, record: &TopicRecord) -> DomainResult<()>;

    /// All non-core rows for a user ordered by `(last_used_at asc,
    /// hit_count asc)`, eviction candidates first.
    async fn list_non_core_by_user(&self, user_id: &str) -> DomainResult<Vec<TopicRecord>>;

    /// Clear the memo on a specific row. The row itself is retained.
    async fn clear_memo(&self, id: Uuid) -> DomainResult<()>;
}
