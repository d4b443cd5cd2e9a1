use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::IntentAnchor;

/// Repository trait for the intent anchor store.
///
/// At most one current row exists per user. Updates are identity-scoped:
/// callers patch a specific row by id, never by a bulk user predicate, so
/// concurrent duplicate rows (possible under insert races in stores without
/// a unique constraint) are never corrupted together.
#[async_trait]
pub trait AnchorRepository: Send + Sync {
    /// Load the most recent anchor row for a user, or None.
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Option<IntentAnchor>>;

    /// Insert a fresh anchor row.
    async fn insert(&self, anchor: &IntentAnchor) -> DomainResult<()>;

    /// Patch the row with the given id. The whole record is written back;
    /// the id selects the row.
    async fn update_by_id(&self, id: Uuid, anchor: &IntentAnchor) -> DomainResult<()>;
}
