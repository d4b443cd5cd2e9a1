//! Per-turn conversational snapshot and the symbolic vocabulary it is built from.
//!
//! A `ConversationSnapshot` lives exactly one turn. It is reconstructed from
//! the previous turn's persisted projection plus current input; there is no
//! long-lived session object. All upstream strings are normalized into the
//! closed types here at one seam (`from_str`-style constructors) so the rest
//! of the core never touches free-form casing.

use serde::{Deserialize, Serialize};

/// Coarse Inner/Outer orientation of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Attention is directed inward: feelings, meaning, self-state.
    Inner,
    /// Attention is directed outward: plans, actions, the world.
    Outer,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inner" => Some(Self::Inner),
            "outer" => Some(Self::Outer),
            _ => None,
        }
    }
}

/// The six depth-band letters of the fixed 18-symbol lattice.
///
/// The first three form the `Sri` rotation loop, the last three the `Tcf`
/// loop. Band groupings used by the risk model: S is the early band, R the
/// relational band, T transitional, and I/C/F the creative/integrative bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthLetter {
    /// Sensing: surface/early contact.
    S,
    /// Relating: relational depth.
    R,
    /// Integrating: weaving insight together.
    I,
    /// Turning: transition toward making.
    T,
    /// Creating: concrete creative work.
    C,
    /// Flourishing: expansion outward.
    F,
}

impl DepthLetter {
    pub const ALL: [Self; 6] = [Self::S, Self::R, Self::I, Self::T, Self::C, Self::F];

    pub fn as_char(&self) -> char {
        match self {
            Self::S => 'S',
            Self::R => 'R',
            Self::I => 'I',
            Self::T => 'T',
            Self::C => 'C',
            Self::F => 'F',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(Self::S),
            'R' => Some(Self::R),
            'I' => Some(Self::I),
            'T' => Some(Self::T),
            'C' => Some(Self::C),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    /// True for the relational band (used by the branch selector).
    pub fn is_relational(&self) -> bool {
        matches!(self, Self::R)
    }

    /// True for the creation/relational band that qualifies an intent bridge.
    pub fn is_bridge_band(&self) -> bool {
        matches!(self, Self::C | Self::R)
    }

    /// Risk weight of this band for the descent gate. Early and relational
    /// bands are riskier than creative/integrative ones.
    pub fn descent_risk(&self) -> f64 {
        match self {
            Self::S => 0.80,
            Self::R => 0.70,
            Self::T => 0.50,
            Self::I => 0.30,
            Self::C => 0.25,
            Self::F => 0.20,
        }
    }
}

/// A two-character depth symbol: band letter plus sub-level 1..=3.
///
/// Invariant: only values matching `^[SRITCF][1-3]$` exist. Construction
/// goes through [`DepthStage::parse`] or [`DepthStage::new`], both of which
/// reject anything outside the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepthStage {
    letter: DepthLetter,
    level: u8,
}

impl DepthStage {
    /// Build a stage from parts. Returns None when level is outside 1..=3.
    pub fn new(letter: DepthLetter, level: u8) -> Option<Self> {
        if (1..=3).contains(&level) {
            Some(Self { letter, level })
        } else {
            None
        }
    }

    /// Parse a two-character symbol like `"R2"`. Total: returns None on any
    /// malformed input, including empty strings.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let letter = DepthLetter::from_char(chars.next()?)?;
        let level = chars.next()?.to_digit(10)? as u8;
        if chars.next().is_some() {
            return None;
        }
        Self::new(letter, level)
    }

    pub fn letter(&self) -> DepthLetter {
        self.letter
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

impl std::fmt::Display for DepthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.level)
    }
}

/// One of five symbolic classifiers of the turn's emotional quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QCode {
    /// Settled, quiet presence.
    Still,
    /// Gentle movement, curiosity.
    Stirring,
    /// Energized, activated.
    Charged,
    /// Agitated, swirling.
    Turbulent,
    /// Heavy, withdrawn.
    Sunken,
}

impl QCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Still => "still",
            Self::Stirring => "stirring",
            Self::Charged => "charged",
            Self::Turbulent => "turbulent",
            Self::Sunken => "sunken",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "still" => Some(Self::Still),
            "stirring" => Some(Self::Stirring),
            "charged" => Some(Self::Charged),
            "turbulent" => Some(Self::Turbulent),
            "sunken" => Some(Self::Sunken),
            _ => None,
        }
    }

    /// The three high-intensity codes. Only these qualify a `Tcf -> Sri`
    /// rotation flip.
    pub fn is_high_intensity(&self) -> bool {
        matches!(self, Self::Charged | Self::Turbulent | Self::Sunken)
    }

    /// Risk weight for the descent gate composite. Two codes carry
    /// materially higher weight than the rest.
    pub fn descent_risk(&self) -> f64 {
        match self {
            Self::Turbulent | Self::Sunken => 0.85,
            Self::Charged => 0.55,
            Self::Stirring => 0.35,
            Self::Still => 0.20,
        }
    }
}

/// Five ordered intensity levels for a turn (`eTurn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    E1,
    E2,
    E3,
    E4,
    E5,
}

impl EnergyLevel {
    /// Numeric ordinal 1..=5, used for step-delta computation.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::E1 => 1,
            Self::E2 => 2,
            Self::E3 => 3,
            Self::E4 => 4,
            Self::E5 => 5,
        }
    }

    pub fn from_ordinal(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::E1),
            2 => Some(Self::E2),
            3 => Some(Self::E3),
            4 => Some(Self::E4),
            5 => Some(Self::E5),
            _ => None,
        }
    }

    /// Absolute step distance between two levels.
    pub fn delta(&self, other: Self) -> u8 {
        self.ordinal().abs_diff(other.ordinal())
    }
}

/// Ephemeral per-turn snapshot. Never persisted as a whole; the durable
/// projection of a turn is limited to what the stores record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    /// Raw user text for the turn, untrimmed.
    pub user_text: String,
    /// Depth symbol, when upstream classification produced one.
    pub depth: Option<DepthStage>,
    /// Inner/Outer orientation, when known.
    pub phase: Option<Phase>,
    /// Symbolic emotional code, when known.
    pub q_code: Option<QCode>,
    /// True when this turn follows an explicit session break.
    pub session_break: bool,
    /// Turn intensity level, when known.
    pub energy: Option<EnergyLevel>,
}

impl ConversationSnapshot {
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            depth: None,
            phase: None,
            q_code: None,
            session_break: false,
            energy: None,
        }
    }

    pub fn with_depth(mut self, depth: DepthStage) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_q_code(mut self, q_code: QCode) -> Self {
        self.q_code = Some(q_code);
        self
    }

    pub fn with_energy(mut self, energy: EnergyLevel) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_session_break(mut self, session_break: bool) -> Self {
        self.session_break = session_break;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_stage_parse_valid() {
        let stage = DepthStage::parse("R2").unwrap();
        assert_eq!(stage.letter(), DepthLetter::R);
        assert_eq!(stage.level(), 2);
        assert_eq!(stage.to_string(), "R2");
    }

    #[test]
    fn test_depth_stage_parse_lowercase() {
        let stage = DepthStage::parse("c1").unwrap();
        assert_eq!(stage.letter(), DepthLetter::C);
    }

    #[test]
    fn test_depth_stage_parse_rejects_outside_lattice() {
        assert!(DepthStage::parse("").is_none());
        assert!(DepthStage::parse("X1").is_none());
        assert!(DepthStage::parse("R0").is_none());
        assert!(DepthStage::parse("R4").is_none());
        assert!(DepthStage::parse("R22").is_none());
        assert!(DepthStage::parse("R").is_none());
    }

    #[test]
    fn test_full_lattice_is_eighteen_symbols() {
        let mut count = 0;
        for letter in DepthLetter::ALL {
            for level in 1..=3 {
                assert!(DepthStage::new(letter, level).is_some());
                count += 1;
            }
        }
        assert_eq!(count, 18);
    }

    #[test]
    fn test_energy_delta() {
        assert_eq!(EnergyLevel::E1.delta(EnergyLevel::E4), 3);
        assert_eq!(EnergyLevel::E4.delta(EnergyLevel::E1), 3);
        assert_eq!(EnergyLevel::E3.delta(EnergyLevel::E3), 0);
    }

    #[test]
    fn test_q_code_high_intensity() {
        assert!(QCode::Charged.is_high_intensity());
        assert!(QCode::Turbulent.is_high_intensity());
        assert!(QCode::Sunken.is_high_intensity());
        assert!(!QCode::Still.is_high_intensity());
        assert!(!QCode::Stirring.is_high_intensity());
    }

    #[test]
    fn test_descent_risk_ordering() {
        // Early and relational bands are riskier than creative/integrative.
        assert!(DepthLetter::S.descent_risk() > DepthLetter::C.descent_risk());
        assert!(DepthLetter::R.descent_risk() > DepthLetter::I.descent_risk());
    }

    #[test]
    fn test_phase_round_trip() {
        assert_eq!(Phase::from_str("Inner"), Some(Phase::Inner));
        assert_eq!(Phase::from_str(" outer "), Some(Phase::Outer));
        assert_eq!(Phase::from_str("sideways"), None);
    }
}
