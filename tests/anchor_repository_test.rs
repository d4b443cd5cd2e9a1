//! Integration tests for the SQLite anchor repository and the anchor
//! service layered over it.

use std::sync::Arc;

use tiller::domain::models::{AnchorConfig, AnchorEvent, CommitmentStage, IntentAnchor};
use tiller::domain::ports::AnchorRepository;
use tiller::infrastructure::database::{DatabaseConnection, SqliteAnchorRepository};
use tiller::services::{AnchorService, AnchorUpsertOutcome};

async fn setup() -> SqliteAnchorRepository {
    let db = DatabaseConnection::new("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    db.migrate().await.expect("failed to run migrations");
    SqliteAnchorRepository::new(db.pool().clone())
}

#[tokio::test]
async fn test_insert_and_find_round_trip() {
    let repo = setup().await;
    let anchor = IntentAnchor::new("u1", "run a small bakery")
        .with_strength(0.8)
        .with_levels(3, 1)
        .with_stage(CommitmentStage::Forming);
    repo.insert(&anchor).await.expect("insert failed");

    let loaded = repo
        .find_by_user("u1")
        .await
        .expect("find failed")
        .expect("anchor missing");
    assert_eq!(loaded.id, anchor.id);
    assert_eq!(loaded.anchor_text, "run a small bakery");
    assert_eq!(loaded.stage, CommitmentStage::Forming);
    assert_eq!(loaded.y_level, 3);
    assert!(loaded.history.is_empty());
}

#[tokio::test]
async fn test_find_missing_user_is_none() {
    let repo = setup().await;
    assert!(repo.find_by_user("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_targets_row_by_identity() {
    let repo = setup().await;
    let mut anchor = IntentAnchor::new("u1", "run a small bakery");
    repo.insert(&anchor).await.unwrap();

    anchor.anchor_text = "teach bread making".to_string();
    anchor.stage = CommitmentStage::Committed;
    repo.update_by_id(anchor.id, &anchor).await.unwrap();

    let loaded = repo.find_by_user("u1").await.unwrap().unwrap();
    assert_eq!(loaded.anchor_text, "teach bread making");
    assert_eq!(loaded.stage, CommitmentStage::Committed);
}

#[tokio::test]
async fn test_update_unknown_id_errors() {
    let repo = setup().await;
    let anchor = IntentAnchor::new("u1", "never inserted");
    assert!(repo.update_by_id(anchor.id, &anchor).await.is_err());
}

#[tokio::test]
async fn test_history_survives_round_trip() {
    let service = AnchorService::new(Arc::new(setup().await), AnchorConfig::default());

    service
        .upsert("u1", "run a small bakery", 0.8, 3, 1, AnchorEvent::Set)
        .await
        .unwrap();
    service
        .upsert("u1", "teach bread making classes", 0.7, 2, 2, AnchorEvent::Reset)
        .await
        .unwrap();

    let anchor = service.load("u1").await.unwrap().unwrap();
    assert_eq!(anchor.anchor_text, "teach bread making classes");
    assert_eq!(anchor.history.len(), 1);
    assert_eq!(anchor.history[0].anchor_text, "run a small bakery");
}

#[tokio::test]
async fn test_upsert_is_idempotent_for_identical_text() {
    let service = AnchorService::new(Arc::new(setup().await), AnchorConfig::default());

    service
        .upsert("u1", "run a small bakery", 0.8, 3, 1, AnchorEvent::Set)
        .await
        .unwrap();
    let before = service.load("u1").await.unwrap().unwrap();

    let outcome = service
        .upsert("u1", "run   a small bakery", 0.2, 5, 5, AnchorEvent::Set)
        .await
        .unwrap();
    assert_eq!(outcome, AnchorUpsertOutcome::UnchangedIdentical);

    let after = service.load("u1").await.unwrap().unwrap();
    assert_eq!(after.id, before.id);
    assert!(after.history.is_empty());
    assert!((after.intent_strength - 0.8).abs() < f64::EPSILON);
    assert_eq!(after.y_level, 3);
    // Only the timestamp may move.
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn test_meta_candidates_never_reach_storage() {
    let service = AnchorService::new(Arc::new(setup().await), AnchorConfig::default());
    let outcome = service
        .upsert("u1", "debug the server error log", 0.9, 0, 0, AnchorEvent::Set)
        .await
        .unwrap();
    assert_eq!(outcome, AnchorUpsertOutcome::RejectedMeta);
    assert!(service.load("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_users_are_isolated() {
    let repo = Arc::new(setup().await);
    let service = AnchorService::new(Arc::clone(&repo), AnchorConfig::default());

    service
        .upsert("u1", "run a small bakery", 0.8, 0, 0, AnchorEvent::Set)
        .await
        .unwrap();
    service
        .upsert("u2", "sail across the channel", 0.6, 0, 0, AnchorEvent::Set)
        .await
        .unwrap();

    assert_eq!(
        service.load("u1").await.unwrap().unwrap().anchor_text,
        "run a small bakery"
    );
    assert_eq!(
        service.load("u2").await.unwrap().unwrap().anchor_text,
        "sail across the channel"
    );
}
