//! Port trait definitions (Hexagonal Architecture).
//!
//! Async trait interfaces that infrastructure adapters must implement:
//! - `AnchorRepository`: storage for the single per-user intent anchor
//! - `TopicRepository`: storage for per-topic memory rows
//! - `Generator`: the out-of-scope text-generation backend
//!
//! These contracts keep the decision core independent of storage and model
//! backends; repository handles are constructed once per process and passed
//! in explicitly, with no ambient globals.

pub mod anchor_repository;
pub mod generator;
pub mod topic_repository;

pub use anchor_repository::AnchorRepository;
pub use generator::{Generator, GeneratorHints, GeneratorMessage};
pub use topic_repository::TopicRepository;
