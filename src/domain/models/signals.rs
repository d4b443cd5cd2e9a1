//! Structured turn signals and the normalized input/brake classifications.

use serde::{Deserialize, Serialize};

/// Boolean/string signals extracted from a single user utterance.
///
/// Produced by the signal extractor; consumed by the branch selector and the
/// expression gate. All fields default to the neutral value so a missing
/// extraction degrades safely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSignals {
    /// "You already said this / you forgot" complaint.
    pub repair: bool,
    /// Short negation or loop language ("same thing again").
    pub stuck: bool,
    /// Genuinely low-information utterance (bare pronoun, bare ack).
    pub detail: bool,
    /// Salient topic token, when one could be lifted from the text.
    pub topic_hint: Option<String>,
}

/// Coarse size classification of the raw input.
///
/// Counts characters, not bytes, so CJK input classifies the same as Latin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Nothing left after trimming.
    Empty,
    /// A couple of characters; too small to carry a proposition.
    Micro,
    /// A short phrase.
    Short,
    /// A full utterance.
    Full,
}

impl InputKind {
    /// Classify trimmed text by character count.
    pub fn classify(text: &str) -> Self {
        let trimmed = text.trim();
        let chars = trimmed.chars().count();
        match chars {
            0 => Self::Empty,
            1..=3 => Self::Micro,
            4..=15 => Self::Short,
            _ => Self::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Micro => "micro",
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

/// Normalized form of the upstream free-form brake-release reason.
///
/// This is the single seam where the upstream string vocabulary is folded
/// into a closed type; nothing past the speech policy gate ever matches on
/// the raw string again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrakeSignal {
    /// No brake in effect.
    #[default]
    None,
    /// A suppression-style hold: pause output unless the input carries weight.
    SoftHold,
    /// Mirroring is explicitly suppressed for this turn.
    NoMirror,
}

impl BrakeSignal {
    /// Fold a raw upstream reason string into the closed type.
    ///
    /// Matching is substring-based and case-insensitive because upstream
    /// producers disagree about casing and separators. `no_mirror` patterns
    /// win over generic hold patterns.
    pub fn normalize(reason: Option<&str>) -> Self {
        let Some(reason) = reason else {
            return Self::None;
        };
        let lower = reason.trim().to_lowercase();
        if lower.is_empty() {
            return Self::None;
        }
        if lower.contains("no_mirror") || lower.contains("no-mirror") || lower.contains("mirror_off")
        {
            return Self::NoMirror;
        }
        if lower.contains("suppress") || lower.contains("hold") || lower.contains("brake") {
            return Self::SoftHold;
        }
        Self::None
    }
}

/// What kind of act the turn resolved to upstream of the speech gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAct {
    /// Ordinary generation turn.
    Normal,
    /// Introspective/diagnostic turn; rotation must not color rendering.
    Introspective,
    /// Suppressed entirely; placeholder text only.
    Silence,
    /// Suppressed with a fixed forward token.
    Forward,
}

impl TurnAct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Introspective => "introspective",
            Self::Silence => "silence",
            Self::Forward => "forward",
        }
    }
}

/// Act/reason/confidence derived by upstream logic before the speech gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedAct {
    pub act: TurnAct,
    /// Free-form audit note from the deriving layer.
    pub reason: Option<String>,
    /// Confidence in the derivation, 0.0..=1.0.
    pub confidence: f64,
}

impl Default for DerivedAct {
    fn default() -> Self {
        Self {
            act: TurnAct::Normal,
            reason: None,
            confidence: 1.0,
        }
    }
}
