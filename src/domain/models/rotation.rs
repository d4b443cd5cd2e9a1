//! Rotation loop identity and position.
//!
//! Two fixed 3-axis loops track gradual movement through related depth
//! bands. The state is a plain value carried turn to turn through the
//! persisted projection; the engine that advances it lives in
//! `services::rotation_engine`.

use serde::{Deserialize, Serialize};

use super::snapshot::DepthLetter;

/// A rotation axis. Doubles as the rendering lane handed to downstream
/// formatting; axis `C` is the concretize lane.
pub type Axis = DepthLetter;

/// One of the two fixed 3-axis loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationLoop {
    /// Sensing -> Relating -> Integrating.
    Sri,
    /// Turning -> Creating -> Flourishing.
    Tcf,
}

impl RotationLoop {
    /// The loop's axes in step order.
    pub fn axes(&self) -> [Axis; 3] {
        match self {
            Self::Sri => [DepthLetter::S, DepthLetter::R, DepthLetter::I],
            Self::Tcf => [DepthLetter::T, DepthLetter::C, DepthLetter::F],
        }
    }

    /// Step index of `letter` within this loop, when it belongs to it.
    pub fn step_of(&self, letter: DepthLetter) -> Option<u8> {
        self.axes()
            .iter()
            .position(|axis| *axis == letter)
            .map(|i| i as u8)
    }

    /// The loop whose axis set contains `letter`.
    pub fn containing(letter: DepthLetter) -> Self {
        match letter {
            DepthLetter::S | DepthLetter::R | DepthLetter::I => Self::Sri,
            DepthLetter::T | DepthLetter::C | DepthLetter::F => Self::Tcf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sri => "sri",
            Self::Tcf => "tcf",
        }
    }
}

/// Loop identity plus position, 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub active_loop: RotationLoop,
    pub step: u8,
}

impl RotationState {
    pub fn new(active_loop: RotationLoop, step: u8) -> Self {
        Self {
            active_loop,
            step: step % 3,
        }
    }

    /// The axis currently under the cursor.
    pub fn active_axis(&self) -> Axis {
        self.active_loop.axes()[usize::from(self.step % 3)]
    }

    /// Position after one more advance, precomputed for callers that plan a
    /// step ahead.
    pub fn next_step(&self) -> u8 {
        (self.step + 1) % 3
    }
}

/// Engine output: the state to carry forward plus rendering flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationOutcome {
    pub state: RotationState,
    /// Precomputed `(step + 1) % 3`.
    pub next_step: u8,
    /// True on introspective turns: the state is still computed and may be
    /// persisted, but must not influence this turn's rendering.
    pub suppress_spin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_order() {
        assert_eq!(
            RotationLoop::Sri.axes(),
            [DepthLetter::S, DepthLetter::R, DepthLetter::I]
        );
        assert_eq!(
            RotationLoop::Tcf.axes(),
            [DepthLetter::T, DepthLetter::C, DepthLetter::F]
        );
    }

    #[test]
    fn test_step_of() {
        assert_eq!(RotationLoop::Sri.step_of(DepthLetter::R), Some(1));
        assert_eq!(RotationLoop::Sri.step_of(DepthLetter::C), None);
        assert_eq!(RotationLoop::Tcf.step_of(DepthLetter::F), Some(2));
    }

    #[test]
    fn test_containing_loop() {
        assert_eq!(RotationLoop::containing(DepthLetter::S), RotationLoop::Sri);
        assert_eq!(RotationLoop::containing(DepthLetter::C), RotationLoop::Tcf);
    }

    #[test]
    fn test_next_step_wraps() {
        let state = RotationState::new(RotationLoop::Sri, 2);
        assert_eq!(state.next_step(), 0);
        assert_eq!(state.active_axis(), DepthLetter::I);
    }

    #[test]
    fn test_new_normalizes_step() {
        let state = RotationState::new(RotationLoop::Tcf, 7);
        assert_eq!(state.step, 1);
        assert_eq!(state.active_axis(), DepthLetter::C);
    }
}
