//! Domain errors for the orchestration core.
//!
//! Nothing here is fatal to the process. Pure decision components are total
//! and never produce these; errors exist only at the repository seam and the
//! generator boundary, and always name the specific operation that failed so
//! a turn's already-computed decision survives intact.

use thiserror::Error;

/// Domain-level errors surfaced by the stateful operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Anchor not found for user: {0}")]
    AnchorNotFound(String),

    #[error("Topic not found: {user_id}/{topic_key}")]
    TopicNotFound { user_id: String, topic_key: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Generator failed: {0}")]
    GeneratorFailed(String),

    #[error("Generator timed out after {0}s")]
    GeneratorTimeout(u64),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
