//! Decision components and the services over the two durable stores.
//!
//! Components 1 through 10 (signal extraction through stage promotion) are
//! pure, synchronous, side-effect-free functions with no suspension points.
//! They may run on any thread, in any order, and may be re-run speculatively
//! for the same user: they mutate nothing. Only the anchor and topic
//! services, and the conversation service that sequences a whole turn, touch
//! the outside world.

pub mod anchor_service;
pub mod branch_selector;
pub mod context_summarizer;
pub mod conversation_service;
pub mod descent_gate;
pub mod expression;
pub mod rotation_engine;
pub mod signal_extractor;
pub mod speech_policy;
pub mod stage_promoter;
pub mod topic_memory;
pub mod turn_pipeline;
pub mod view_shift;
pub mod volatility_control;

pub use anchor_service::{AnchorService, AnchorUpsertOutcome};
pub use branch_selector::select_branch;
pub use context_summarizer::{summarize_context, ContextLine, ContextSource};
pub use conversation_service::{ConversationService, TurnOutcome};
pub use descent_gate::decide_descent_gate;
pub use expression::{select_expression, ExpressionContext};
pub use rotation_engine::rotate;
pub use signal_extractor::extract_signals;
pub use speech_policy::{decide_speech, FORWARD_TEXT, SILENCE_TEXT};
pub use stage_promoter::decide_promotion;
pub use topic_memory::TopicMemoryService;
pub use turn_pipeline::decide_turn;
pub use view_shift::detect_view_shift;
pub use volatility_control::control_volatility;
