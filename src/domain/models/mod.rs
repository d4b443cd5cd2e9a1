pub mod anchor;
pub mod config;
pub mod decision;
pub mod descent;
pub mod promotion;
pub mod rotation;
pub mod signals;
pub mod snapshot;
pub mod topic;
pub mod volatility;

pub use anchor::{
    normalize_anchor_text, AnchorDirective, AnchorEvent, AnchorHistoryEntry, AnchorKey,
    CommitmentStage, IntentAnchor,
};
pub use config::{
    AnchorConfig, Config, DatabaseConfig, DescentConfig, ExpressionConfig, GeneratorConfig,
    LoggingConfig, PromotionConfig, SummaryConfig, TopicConfig, ViewShiftConfig, VolatilityConfig,
};
pub use decision::{
    Branch, ExpressionPlan, ShiftVariant, SpeechPolicy, SuppressionMeta, SuppressionRule,
    TurnDecision, TurnInput, TurnProjection, ViewShift,
};
pub use descent::{DescentDecision, DescentGate, GoalKind};
pub use promotion::{PromotionBlock, PromotionDecision, PromotionEvidence};
pub use rotation::{Axis, RotationLoop, RotationOutcome, RotationState};
pub use signals::{BrakeSignal, DerivedAct, InputKind, TurnAct, TurnSignals};
pub use snapshot::{ConversationSnapshot, DepthLetter, DepthStage, EnergyLevel, Phase, QCode};
pub use topic::{TopicImportance, TopicObservation, TopicRecord};
pub use volatility::{Direction, PromptStyle, StabilityBand, VolatilityRank, VolatilityState};
