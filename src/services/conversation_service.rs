//! Conversation service: drives the pure pipeline, the generator call, and
//! the post-turn memory updates for one user turn.
//!
//! The pipeline up to the speech verdict is a strict synchronous chain. The
//! generator call is the single genuine suspension point and the only place
//! a timeout is meaningful: on timeout or failure the turn degrades to the
//! Forward contract (fixed fallback, no persistence, no retry loop). Memory
//! updates run after the user-visible response is settled; their failures
//! are logged and never abort the turn, because the decision they would
//! have annotated is already complete.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AnchorDirective, AnchorKey, Config, IntentAnchor, PromotionEvidence, TopicObservation,
    TurnDecision, TurnInput, TurnProjection,
};
use crate::domain::ports::{AnchorRepository, Generator, GeneratorHints, GeneratorMessage, TopicRepository};

use super::anchor_service::AnchorService;
use super::speech_policy::FORWARD_TEXT;
use super::stage_promoter::decide_promotion;
use super::topic_memory::TopicMemoryService;
use super::turn_pipeline::decide_turn;

/// What one turn produced, user-visible text included.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub decision: TurnDecision,
    /// The text to show: generated, or the verdict's fixed fallback.
    pub assistant_text: Option<String>,
    /// Whether the assistant turn may enter durable history.
    pub persisted_assistant: bool,
    /// True when generation failed and the turn fell back to the Forward
    /// contract.
    pub degraded: bool,
}

/// The orchestration entry point. Repositories and the generator are
/// injected once at construction and passed by reference thereafter; there
/// is no ambient global client.
pub struct ConversationService<G, A, T>
where
    G: Generator,
    A: AnchorRepository,
    T: TopicRepository,
{
    generator: Arc<G>,
    anchors: AnchorService<A>,
    topics: TopicMemoryService<T>,
    config: Config,
}

impl<G, A, T> ConversationService<G, A, T>
where
    G: Generator,
    A: AnchorRepository,
    T: TopicRepository,
{
    pub fn new(generator: Arc<G>, anchor_repo: Arc<A>, topic_repo: Arc<T>, config: Config) -> Self {
        let anchors = AnchorService::new(anchor_repo, config.anchor);
        let topics = TopicMemoryService::new(topic_repo, config.topic);
        Self {
            generator,
            anchors,
            topics,
            config,
        }
    }

    /// Access to the anchor store, for callers that manage anchors outside
    /// a turn.
    pub fn anchors(&self) -> &AnchorService<A> {
        &self.anchors
    }

    /// Access to the topic store.
    pub fn topics(&self) -> &TopicMemoryService<T> {
        &self.topics
    }

    /// Run one full turn for a user.
    pub async fn run_turn(
        &self,
        user_id: &str,
        input: TurnInput,
        mut projection: TurnProjection,
    ) -> TurnOutcome {
        // Surface the stored anchor to the pipeline when the caller did not
        // already project it.
        if projection.anchor_text.is_none() {
            match self.anchors.load(user_id).await {
                Ok(anchor) => projection.anchor_text = anchor.map(|a| a.anchor_text),
                Err(err) => warn!(user_id, %err, "anchor load failed; deciding without it"),
            }
        }

        let decision = decide_turn(&input, &projection, &self.config);

        if decision.speech.is_suppressed() {
            // Short-circuit: no generator, no persistence, no memory writes.
            let text = decision.speech.text.clone();
            return TurnOutcome {
                decision,
                assistant_text: text,
                persisted_assistant: false,
                degraded: false,
            };
        }

        let (assistant_text, persisted, degraded) = match self.generate(&input, &decision).await {
            Ok(text) => (Some(text), decision.speech.should_persist_assistant, false),
            Err(err) => {
                // Failure and timeout collapse to the Forward contract: a
                // fixed fallback, nothing persisted, nothing retried.
                warn!(user_id, %err, "generation failed; degrading to forward");
                (Some(FORWARD_TEXT.to_string()), false, true)
            }
        };

        self.post_turn_memory(user_id, &input, &decision).await;

        TurnOutcome {
            decision,
            assistant_text,
            persisted_assistant: persisted,
            degraded,
        }
    }

    /// The out-of-scope generator call, bounded by the configured timeout.
    async fn generate(&self, input: &TurnInput, decision: &TurnDecision) -> DomainResult<String> {
        let mut messages = Vec::new();
        if let Some(assistant) = &input.last_assistant_text {
            messages.push(GeneratorMessage {
                role: "assistant".to_string(),
                content: assistant.clone(),
            });
        }
        messages.push(GeneratorMessage {
            role: "user".to_string(),
            content: input.snapshot.user_text.clone(),
        });

        let hints = GeneratorHints {
            preface: decision.expression.preface.clone(),
            lane: decision.expression.lane,
        };

        let timeout = Duration::from_secs(self.config.generator.timeout_secs);
        match tokio::time::timeout(timeout, self.generator.generate(messages, hints)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::GeneratorTimeout(
                self.config.generator.timeout_secs,
            )),
        }
    }

    /// Post-turn memory updates. Fire-and-forget semantics: each store's
    /// failure is logged on its own and the turn outcome stands.
    async fn post_turn_memory(&self, user_id: &str, input: &TurnInput, decision: &TurnDecision) {
        if let Some(directive) = &input.anchor_directive {
            // Promotion compares against the anchor as it stood before this
            // turn's write.
            let prior = match self.anchors.load(user_id).await {
                Ok(prior) => prior,
                Err(err) => {
                    warn!(user_id, %err, "anchor load failed before upsert");
                    None
                }
            };

            match self
                .anchors
                .upsert(
                    user_id,
                    &directive.candidate_text,
                    directive.strength,
                    directive.y_level,
                    directive.h_level,
                    directive.event,
                )
                .await
            {
                Ok(outcome) => info!(user_id, ?outcome, "anchor upsert"),
                Err(err) => warn!(user_id, %err, "anchor upsert failed"),
            }

            if let Some(evidence) = &input.promotion_evidence {
                if let Err(err) = self
                    .try_promotion(user_id, directive, evidence, prior.as_ref())
                    .await
                {
                    warn!(user_id, %err, "stage promotion attempt failed");
                }
            }
        }

        if let Some(topic_key) = &decision.signals.topic_hint {
            let observation = TopicObservation {
                q_code: input.snapshot.q_code,
                depth: input.snapshot.depth,
                phase: input.snapshot.phase,
                memo_summary: None,
                importance_hint: None,
            };
            if let Err(err) = self.topics.upsert(user_id, topic_key, observation).await {
                warn!(user_id, topic_key, %err, "topic upsert failed");
            }
        }
    }

    async fn try_promotion(
        &self,
        user_id: &str,
        directive: &AnchorDirective,
        evidence: &PromotionEvidence,
        prior: Option<&IntentAnchor>,
    ) -> DomainResult<()> {
        let Some(prior) = prior else {
            return Ok(());
        };

        let current_key = AnchorKey::from_text(&directive.candidate_text);
        let previous_key = AnchorKey::from_text(&prior.anchor_text);
        let decision = decide_promotion(
            directive.event,
            prior.stage,
            &current_key,
            Some(&previous_key),
            evidence,
            &self.config.promotion,
        );

        if decision.upgrade {
            self.anchors.apply_promotion(user_id).await?;
        } else if let Some(reason) = decision.blocked_by {
            info!(user_id, reason = reason.as_str(), "stage promotion blocked");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        AnchorDirective, AnchorEvent, ConversationSnapshot, DepthStage, Phase, PromotionEvidence,
        QCode, TurnAct,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;
    use uuid::Uuid;

    struct FixedGenerator {
        reply: &'static str,
        calls: AtomicUsize,
    }

    impl FixedGenerator {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Generator for FixedGenerator {
        async fn generate(
            &self,
            _messages: Vec<GeneratorMessage>,
            _hints: GeneratorHints,
        ) -> DomainResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(
            &self,
            _messages: Vec<GeneratorMessage>,
            _hints: GeneratorHints,
        ) -> DomainResult<String> {
            Err(DomainError::GeneratorFailed("backend down".to_string()))
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl Generator for SlowGenerator {
        async fn generate(
            &self,
            _messages: Vec<GeneratorMessage>,
            _hints: GeneratorHints,
        ) -> DomainResult<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    #[derive(Default)]
    struct MemoryAnchorRepo {
        rows: Mutex<HashMap<Uuid, crate::domain::models::IntentAnchor>>,
    }

    #[async_trait]
    impl AnchorRepository for MemoryAnchorRepo {
        async fn find_by_user(
            &self,
            user_id: &str,
        ) -> DomainResult<Option<crate::domain::models::IntentAnchor>> {
            let rows = self.rows.lock().await;
            Ok(rows
                .values()
                .filter(|a| a.user_id == user_id)
                .max_by_key(|a| a.updated_at)
                .cloned())
        }

        async fn insert(&self, anchor: &crate::domain::models::IntentAnchor) -> DomainResult<()> {
            self.rows.lock().await.insert(anchor.id, anchor.clone());
            Ok(())
        }

        async fn update_by_id(
            &self,
            id: Uuid,
            anchor: &crate::domain::models::IntentAnchor,
        ) -> DomainResult<()> {
            self.rows.lock().await.insert(id, anchor.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryTopicRepo {
        rows: Mutex<HashMap<Uuid, crate::domain::models::TopicRecord>>,
    }

    #[async_trait]
    impl TopicRepository for MemoryTopicRepo {
        async fn find(
            &self,
            user_id: &str,
            topic_key: &str,
        ) -> DomainResult<Option<crate::domain::models::TopicRecord>> {
            let rows = self.rows.lock().await;
            Ok(rows
                .values()
                .find(|r| r.user_id == user_id && r.topic_key == topic_key)
                .cloned())
        }

        async fn insert(&self, record: &crate::domain::models::TopicRecord) -> DomainResult<()> {
            self.rows.lock().await.insert(record.id, record.clone());
            Ok(())
        }

        async fn update_by_id(
            &self,
            id: Uuid,
            record: &crate::domain::models::TopicRecord,
        ) -> DomainResult<()> {
            self.rows.lock().await.insert(id, record.clone());
            Ok(())
        }

        async fn list_non_core_by_user(
            &self,
            user_id: &str,
        ) -> DomainResult<Vec<crate::domain::models::TopicRecord>> {
            let rows = self.rows.lock().await;
            let mut list: Vec<_> = rows
                .values()
                .filter(|r| {
                    r.user_id == user_id
                        && r.importance != crate::domain::models::TopicImportance::Core
                })
                .cloned()
                .collect();
            list.sort_by(|a, b| {
                a.last_used_at
                    .cmp(&b.last_used_at)
                    .then(a.hit_count.cmp(&b.hit_count))
            });
            Ok(list)
        }

        async fn clear_memo(&self, id: Uuid) -> DomainResult<()> {
            let mut rows = self.rows.lock().await;
            if let Some(record) = rows.get_mut(&id) {
                record.memo_summary = None;
            }
            Ok(())
        }
    }

    fn service_with<G: Generator>(
        generator: G,
        config: Config,
    ) -> ConversationService<G, MemoryAnchorRepo, MemoryTopicRepo> {
        ConversationService::new(
            Arc::new(generator),
            Arc::new(MemoryAnchorRepo::default()),
            Arc::new(MemoryTopicRepo::default()),
            config,
        )
    }

    fn input_with_text(text: &str) -> TurnInput {
        TurnInput::new(
            ConversationSnapshot::new(text)
                .with_depth(DepthStage::parse("S1").unwrap())
                .with_phase(Phase::Inner)
                .with_q_code(QCode::Still),
        )
    }

    #[tokio::test]
    async fn test_normal_turn_generates_and_persists() {
        let service = service_with(FixedGenerator::new("a warm reply"), Config::default());
        let outcome = service
            .run_turn("u1", input_with_text("tell me about bread"), TurnProjection::default())
            .await;
        assert_eq!(outcome.assistant_text.as_deref(), Some("a warm reply"));
        assert!(outcome.persisted_assistant);
        assert!(!outcome.degraded);
    }

    #[tokio::test]
    async fn test_suppressed_turn_never_calls_generator() {
        let generator = FixedGenerator::new("should never appear");
        let service = service_with(generator, Config::default());
        let outcome = service
            .run_turn("u1", input_with_text(""), TurnProjection::default())
            .await;
        assert_eq!(outcome.decision.speech.act, TurnAct::Silence);
        assert!(!outcome.persisted_assistant);
        assert_eq!(service.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generator_failure_degrades_to_forward() {
        let service = service_with(FailingGenerator, Config::default());
        let outcome = service
            .run_turn("u1", input_with_text("tell me about bread"), TurnProjection::default())
            .await;
        assert!(outcome.degraded);
        assert!(!outcome.persisted_assistant);
        assert_eq!(outcome.assistant_text.as_deref(), Some(FORWARD_TEXT));
    }

    #[tokio::test]
    async fn test_generator_timeout_degrades_to_forward() {
        let mut config = Config::default();
        config.generator.timeout_secs = 0;
        let service = service_with(SlowGenerator, config);
        let outcome = service
            .run_turn("u1", input_with_text("tell me about bread"), TurnProjection::default())
            .await;
        assert!(outcome.degraded);
        assert!(!outcome.persisted_assistant);
    }

    #[tokio::test]
    async fn test_anchor_directive_writes_after_generation() {
        let service = service_with(FixedGenerator::new("noted"), Config::default());
        let mut input = input_with_text("決めた。パン屋をやる");
        input.anchor_directive = Some(AnchorDirective {
            event: AnchorEvent::Set,
            candidate_text: "run a small bakery".to_string(),
            strength: 0.8,
            y_level: 3,
            h_level: 1,
        });
        service.run_turn("u1", input, TurnProjection::default()).await;

        let anchor = service.anchors().load("u1").await.unwrap().unwrap();
        assert_eq!(anchor.anchor_text, "run a small bakery");
    }

    #[tokio::test]
    async fn test_topic_hint_writes_topic_row() {
        let topic_repo = Arc::new(MemoryTopicRepo::default());
        let service = ConversationService::new(
            Arc::new(FixedGenerator::new("noted")),
            Arc::new(MemoryAnchorRepo::default()),
            Arc::clone(&topic_repo),
            Config::default(),
        );
        let input = input_with_text("thinking about the bakery again");
        let outcome = service.run_turn("u1", input, TurnProjection::default()).await;
        let hint = outcome.decision.signals.topic_hint.clone().unwrap();
        let record = topic_repo.find("u1", &hint).await.unwrap();
        assert!(record.is_some());
    }

    #[tokio::test]
    async fn test_promotion_applies_when_evidence_holds() {
        let service = service_with(FixedGenerator::new("noted"), Config::default());
        // Seed the anchor at the penultimate stage.
        service
            .anchors()
            .upsert("u1", "run a small bakery", 0.8, 3, 1, AnchorEvent::Set)
            .await
            .unwrap();
        service
            .anchors()
            .set_stage("u1", crate::domain::models::CommitmentStage::Committed)
            .await
            .unwrap();

        let now = Utc::now();
        let mut input = input_with_text("決めた。パン屋をやる");
        input.anchor_directive = Some(AnchorDirective {
            event: AnchorEvent::Set,
            candidate_text: "run a small bakery".to_string(),
            strength: 0.9,
            y_level: 3,
            h_level: 1,
        });
        input.promotion_evidence = Some(PromotionEvidence {
            repeat_count: 4,
            last_recorded_at: Some(now - chrono::Duration::days(3)),
            now,
        });
        service.run_turn("u1", input, TurnProjection::default()).await;

        let anchor = service.anchors().load("u1").await.unwrap().unwrap();
        assert_eq!(anchor.stage, crate::domain::models::CommitmentStage::Anchored);
    }
}
