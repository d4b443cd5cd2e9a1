//! `SQLite` implementation of the topic repository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{DepthStage, Phase, QCode, TopicImportance, TopicRecord};
use crate::domain::ports::TopicRepository;
use crate::infrastructure::database::utils::parse_datetime;

pub struct SqliteTopicRepository {
    pool: SqlitePool,
}

impl SqliteTopicRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

type TopicRow = (
    String,         // id
    String,         // user_id
    String,         // topic_key
    String,         // importance
    i64,            // hit_count
    String,         // last_used_at
    Option<String>, // memo_summary
    Option<String>, // last_q_code
    Option<String>, // last_depth
    Option<String>, // last_phase
    String,         // created_at
    String,         // updated_at
);

const SELECT_COLUMNS: &str = "id, user_id, topic_key, importance, hit_count, last_used_at, \
     memo_summary, last_q_code, last_depth, last_phase, created_at, updated_at";

fn row_to_record(row: TopicRow) -> DomainResult<TopicRecord> {
    let (
        id,
        user_id,
        topic_key,
        importance,
        hit_count,
        last_used_at,
        memo_summary,
        last_q_code,
        last_depth,
        last_phase,
        created_at,
        updated_at,
    ) = row;
    Ok(TopicRecord {
        id: Uuid::parse_str(&id).map_err(|e| DomainError::Database(e.to_string()))?,
        user_id,
        topic_key,
        importance: TopicImportance::from_str(&importance)
            .ok_or_else(|| DomainError::Database(format!("invalid importance: {importance}")))?,
        hit_count,
        last_used_at: parse_datetime(&last_used_at)
            .map_err(|e| DomainError::Database(e.to_string()))?,
        memo_summary,
        // Observed fields degrade to None rather than failing the read.
        last_q_code: last_q_code.as_deref().and_then(QCode::from_str),
        last_depth: last_depth.as_deref().and_then(DepthStage::parse),
        last_phase: last_phase.as_deref().and_then(Phase::from_str),
        created_at: parse_datetime(&created_at)
            .map_err(|e| DomainError::Database(e.to_string()))?,
        updated_at: parse_datetime(&updated_at)
            .map_err(|e| DomainError::Database(e.to_string()))?,
    })
}

#[async_trait]
impl TopicRepository for SqliteTopicRepository {
    async fn find(&self, user_id: &str, topic_key: &str) -> DomainResult<Option<TopicRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM topic_memories WHERE user_id = ? AND topic_key = ?"
        );
        let row: Option<TopicRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(topic_key)
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_record).transpose()
    }

    async fn insert(&self, record: &TopicRecord) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO topic_memories (
                id, user_id, topic_key, importance, hit_count, last_used_at,
                memo_summary, last_q_code, last_depth, last_phase,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.user_id)
        .bind(&record.topic_key)
        .bind(record.importance.as_str())
        .bind(record.hit_count)
        .bind(record.last_used_at.to_rfc3339())
        .bind(&record.memo_summary)
        .bind(record.last_q_code.map(|q| q.as_str()))
        .bind(record.last_depth.map(|d| d.to_string()))
        .bind(record.last_phase.map(|p| p.as_str()))
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, record: &TopicRecord) -> DomainResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE topic_memories
            SET importance = ?, hit_count = ?, last_used_at = ?, memo_summary = ?,
                last_q_code = ?, last_depth = ?, last_phase = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.importance.as_str())
        .bind(record.hit_count)
        .bind(record.last_used_at.to_rfc3339())
        .bind(&record.memo_summary)
        .bind(record.last_q_code.map(|q| q.as_str()))
        .bind(record.last_depth.map(|d| d.to_string()))
        .bind(record.last_phase.map(|p| p.as_str()))
        .bind(record.updated_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TopicNotFound {
                user_id: record.user_id.clone(),
                topic_key: record.topic_key.clone(),
            });
        }
        Ok(())
    }

    async fn list_non_core_by_user(&self, user_id: &str) -> DomainResult<Vec<TopicRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM topic_memories \
             WHERE user_id = ? AND importance != 'core' \
             ORDER BY last_used_at ASC, hit_count ASC"
        );
        let rows: Vec<TopicRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_record).collect()
    }

    async fn clear_memo(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("UPDATE topic_memories SET memo_summary = NULL WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
