//! The per-turn decision object: the sole contract between the orchestration
//! core and everything downstream (rendering, persistence, telemetry).

use serde::{Deserialize, Serialize};

use super::anchor::AnchorDirective;
use super::descent::{DescentGate, GoalKind};
use super::rotation::{Axis, RotationOutcome};
use super::signals::{DerivedAct, InputKind, TurnAct, TurnSignals};
use super::snapshot::ConversationSnapshot;
use super::volatility::{StabilityBand, VolatilityRank, VolatilityState};

/// One discrete conversational branch for the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// The user is repairing the agent's memory of the conversation.
    Repair,
    /// The utterance genuinely lacks recoverable context; ask for more.
    Detail,
    /// Hold position and steady the exchange.
    Stabilize,
    /// Offer explicit options. Reserved for upstream callers; the pure
    /// selector never emits it.
    Options,
    /// Bridge from self-consultation toward creation.
    CBridge,
    /// Bridge from a spoken decision toward intent anchoring.
    IBridge,
    /// No signal matched.
    Unknown,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repair => "repair",
            Self::Detail => "detail",
            Self::Stabilize => "stabilize",
            Self::Options => "options",
            Self::CBridge => "c_bridge",
            Self::IBridge => "i_bridge",
            Self::Unknown => "unknown",
        }
    }
}

/// Severity variant of a detected view shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftVariant {
    /// Gentle continuity check; pacing changed but not the ground.
    Tempo,
    /// Ordinary shift.
    Basic,
    /// Strong shift in how present the user is.
    Presence,
    /// The conversation has branched to different ground.
    Branch,
}

/// View-shift detector output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewShift {
    pub ok: bool,
    /// Sum of the four independent sub-signals, 0..=4.
    pub score: u8,
    pub variant: Option<ShiftVariant>,
    pub confirm_line: Option<String>,
}

impl ViewShift {
    /// The neutral "nothing moved" value.
    pub fn none() -> Self {
        Self {
            ok: false,
            score: 0,
            variant: None,
            confirm_line: None,
        }
    }
}

/// Audit record for a suppression verdict: exactly why the turn was muted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionMeta {
    /// Which gate rule fired.
    pub rule: SuppressionRule,
    pub input_kind: InputKind,
    /// The normalized upstream reason, when one was involved.
    pub reason: Option<String>,
}

/// The closed set of suppression rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionRule {
    EmptyInput,
    MicroUnderHold,
    NoMirror,
}

/// The speech policy verdict: single source of truth for whether the
/// generator may run and whether the turn may be persisted.
///
/// Invariant enforced by the constructors: `allow_llm == false` implies
/// `should_persist_assistant == false`. A suppressed turn never leaks into
/// durable history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechPolicy {
    pub act: TurnAct,
    pub allow_llm: bool,
    /// Exact fallback text for suppressed turns; None on pass-through.
    pub text: Option<String>,
    pub should_persist_assistant: bool,
    /// Downstream rendering must not substitute its own fallback for an
    /// intentionally suppressed turn.
    pub bypass_fallback: bool,
    pub meta: Option<SuppressionMeta>,
}

impl SpeechPolicy {
    /// Pass-through verdict: generation proceeds under `act`.
    pub fn pass(act: TurnAct) -> Self {
        Self {
            act,
            allow_llm: true,
            text: None,
            should_persist_assistant: true,
            bypass_fallback: false,
            meta: None,
        }
    }

    /// Suppression verdict. `allow_llm` and `should_persist_assistant` are
    /// pinned false together here; there is no constructor that can split
    /// them.
    pub fn suppressed(act: TurnAct, text: impl Into<String>, meta: SuppressionMeta) -> Self {
        Self {
            act,
            allow_llm: false,
            text: Some(text.into()),
            should_persist_assistant: false,
            bypass_fallback: true,
            meta: Some(meta),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        !self.allow_llm
    }
}

/// Expression selector output: at most one preface sentence and a lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionPlan {
    /// The active rotation axis, doubling as the rendering lane.
    pub lane: Axis,
    /// One prepended sentence for the generator to weave in, or None.
    pub preface: Option<String>,
    /// Name of the technique that fired, for audit. Serialized outward but
    /// not read back; consumers treat it as a label.
    #[serde(skip_deserializing)]
    pub technique: Option<&'static str>,
    /// Whether post-generation polishing is allowed this turn.
    pub allow_polish: bool,
}

impl ExpressionPlan {
    /// The "off" plan: lane only, no stylistic interference.
    pub fn off(lane: Axis) -> Self {
        Self {
            lane,
            preface: None,
            technique: None,
            allow_polish: true,
        }
    }
}

/// Everything the surrounding application needs to act on a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnDecision {
    pub branch: Branch,
    pub rotation: RotationOutcome,
    pub volatility: VolatilityState,
    pub descent_gate: DescentGate,
    pub speech: SpeechPolicy,
    pub expression: ExpressionPlan,
    pub view_shift: ViewShift,
    /// The reconstructed one-line context used by the branch selector.
    pub context_line: String,
    pub signals: TurnSignals,
}

/// Raw material for one turn: the snapshot plus the loose inputs that do not
/// belong to any durable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnInput {
    pub snapshot: ConversationSnapshot,
    /// Up to 3 most recent user utterances, oldest first.
    pub recent_user_texts: Vec<String>,
    pub last_assistant_text: Option<String>,
    /// Free-form upstream brake-release reason; normalized at the gate.
    pub brake_reason: Option<String>,
    pub derived: DerivedAct,
    pub stability_band: Option<StabilityBand>,
    /// Self-acceptance estimate 0.0..=1.0; missing degrades to medium risk.
    pub self_acceptance: Option<f64>,
    /// Raw `(h, y)` intensity levels, the numeric fallback when no
    /// stability band is supplied.
    pub raw_levels: Option<(u8, u8)>,
    pub goal_kind: Option<GoalKind>,
    /// Upstream hard-stall flag; blocks all stylistic prefaces.
    pub hard_stall: bool,
    /// Anchor write request riding along with this turn, if any.
    pub anchor_directive: Option<AnchorDirective>,
    /// Repetition evidence for a stage promotion attempt, if the caller
    /// gathered any this turn.
    pub promotion_evidence: Option<super::promotion::PromotionEvidence>,
}

impl TurnInput {
    pub fn new(snapshot: ConversationSnapshot) -> Self {
        Self {
            snapshot,
            recent_user_texts: Vec::new(),
            last_assistant_text: None,
            brake_reason: None,
            derived: DerivedAct::default(),
            stability_band: None,
            self_acceptance: None,
            raw_levels: None,
            goal_kind: None,
            hard_stall: false,
            anchor_directive: None,
            promotion_evidence: None,
        }
    }
}

/// The previous turn's persisted projection, reconstructed from storage.
/// There is no live session object; this is all the memory a turn gets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnProjection {
    pub prev_snapshot: Option<ConversationSnapshot>,
    pub prev_rotation: Option<super::rotation::RotationState>,
    pub prev_volatility: Option<VolatilityRank>,
    pub prev_gate: DescentGate,
    /// Durable summary from the topic store, when one exists.
    pub durable_summary: Option<String>,
    /// The user's current anchor text, when one exists.
    pub anchor_text: Option<String>,
}
