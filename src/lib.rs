//! Tiller - Conversation Orchestration Core
//!
//! Tiller is the deterministic decision layer of a conversational agent: it
//! sits between raw user text and a stochastic text-generation backend and
//! decides, every turn, *how* the agent should behave, never what words it
//! should say. It computes the turn's discrete state (branch, rotation
//! position, volatility rank, descent gate), decides whether generation is
//! allowed to run at all, and maintains two durable cross-session memories:
//! a single intent anchor per user and a bounded set of per-topic records.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): closed sum types, entities, and port traits
//! - **Service Layer** (`services`): pure decision components, the per-turn
//!   pipeline, and the two store services
//! - **Infrastructure Layer** (`infrastructure`): `SQLite` repositories,
//!   configuration loading, logging setup
//!
//! # Example
//!
//! ```ignore
//! use tiller::domain::models::{Config, ConversationSnapshot, TurnInput, TurnProjection};
//! use tiller::services::decide_turn;
//!
//! let config = Config::default();
//! let input = TurnInput::new(ConversationSnapshot::new("決めた。パン屋をやる"));
//! let decision = decide_turn(&input, &TurnProjection::default(), &config);
//! assert!(decision.speech.allow_llm);
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Branch, Config, ConversationSnapshot, DepthStage, DescentGate, IntentAnchor, Phase, QCode,
    SpeechPolicy, TopicRecord, TurnAct, TurnDecision, TurnInput, TurnProjection, VolatilityRank,
};
pub use domain::ports::{AnchorRepository, Generator, TopicRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::ConfigLoader;
pub use services::{decide_turn, AnchorService, ConversationService, TopicMemoryService};
