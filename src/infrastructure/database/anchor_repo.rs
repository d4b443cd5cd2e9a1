//! `SQLite` implementation of the anchor repository.
//!
//! The history list is stored as a JSON text column: it is read and written
//! whole with its anchor row, never queried into.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AnchorHistoryEntry, CommitmentStage, IntentAnchor};
use crate::domain::ports::AnchorRepository;
use crate::infrastructure::database::utils::parse_datetime;

pub struct SqliteAnchorRepository {
    pool: SqlitePool,
}

impl SqliteAnchorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

type AnchorRow = (
    String,         // id
    String,         // user_id
    String,         // anchor_text
    f64,            // intent_strength
    i64,            // y_level
    i64,            // h_level
    String,         // stage
    String,         // history (JSON)
    String,         // created_at
    String,         // updated_at
);

fn row_to_anchor(row: AnchorRow) -> DomainResult<IntentAnchor> {
    let (id, user_id, anchor_text, intent_strength, y_level, h_level, stage, history, created_at, updated_at) =
        row;
    let history: Vec<AnchorHistoryEntry> = serde_json::from_str(&history)?;
    Ok(IntentAnchor {
        id: Uuid::parse_str(&id).map_err(|e| DomainError::Database(e.to_string()))?,
        user_id,
        anchor_text,
        intent_strength,
        y_level: u8::try_from(y_level).unwrap_or(0),
        h_level: u8::try_from(h_level).unwrap_or(0),
        stage: CommitmentStage::from_str(&stage)
            .ok_or_else(|| DomainError::Database(format!("invalid stage: {stage}")))?,
        history,
        created_at: parse_datetime(&created_at)
            .map_err(|e| DomainError::Database(e.to_string()))?,
        updated_at: parse_datetime(&updated_at)
            .map_err(|e| DomainError::Database(e.to_string()))?,
    })
}

#[async_trait]
impl AnchorRepository for SqliteAnchorRepository {
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Option<IntentAnchor>> {
        let row: Option<AnchorRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, anchor_text, intent_strength, y_level, h_level,
                   stage, history, created_at, updated_at
            FROM intent_anchors
            WHERE user_id = ?
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_anchor).transpose()
    }

    async fn insert(&self, anchor: &IntentAnchor) -> DomainResult<()> {
        let history = serde_json::to_string(&anchor.history)?;
        sqlx::query(
            r#"
            INSERT INTO intent_anchors (
                id, user_id, anchor_text, intent_strength, y_level, h_level,
                stage, history, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(anchor.id.to_string())
        .bind(&anchor.user_id)
        .bind(&anchor.anchor_text)
        .bind(anchor.intent_strength)
        .bind(i64::from(anchor.y_level))
        .bind(i64::from(anchor.h_level))
        .bind(anchor.stage.as_str())
        .bind(history)
        .bind(anchor.created_at.to_rfc3339())
        .bind(anchor.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, anchor: &IntentAnchor) -> DomainResult<()> {
        let history = serde_json::to_string(&anchor.history)?;
        // Identity-scoped: the WHERE clause names the row, not the user.
        let result = sqlx::query(
            r#"
            UPDATE intent_anchors
            SET anchor_text = ?, intent_strength = ?, y_level = ?, h_level = ?,
                stage = ?, history = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&anchor.anchor_text)
        .bind(anchor.intent_strength)
        .bind(i64::from(anchor.y_level))
        .bind(i64::from(anchor.h_level))
        .bind(anchor.stage.as_str())
        .bind(history)
        .bind(anchor.updated_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AnchorNotFound(anchor.user_id.clone()));
        }
        Ok(())
    }
}
