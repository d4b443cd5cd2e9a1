//! Rotation engine: advances the loop identity and position for a turn.
//!
//! Loop flips are strong-condition only. Never probabilistic, never from a
//! single weak signal. Absence of a matching signal keeps the previous
//! position unchanged (inertia); step is only resynchronized when the new
//! depth letter belongs to the active loop's axis set.

use crate::domain::models::{
    DepthStage, Phase, QCode, RotationLoop, RotationOutcome, RotationState, TurnAct,
};

/// Compute this turn's rotation state.
pub fn rotate(
    previous: Option<RotationState>,
    previous_phase: Option<Phase>,
    phase: Option<Phase>,
    depth: Option<DepthStage>,
    q_code: Option<QCode>,
    act: TurnAct,
) -> RotationOutcome {
    let state = match previous {
        None => initial_state(depth),
        Some(prev) => {
            let flipped = flip_target(prev, previous_phase, phase, depth, q_code);
            let active_loop = flipped.unwrap_or(prev.active_loop);
            // Resync only when the new letter lives on the active loop.
            let step = depth
                .and_then(|d| active_loop.step_of(d.letter()))
                .unwrap_or(prev.step);
            RotationState::new(active_loop, step)
        }
    };

    RotationOutcome {
        state,
        next_step: state.next_step(),
        suppress_spin: act == TurnAct::Introspective,
    }
}

/// First-ever state: the loop containing the current depth letter, cursor on
/// that letter. No depth at all starts the inner loop at its origin.
fn initial_state(depth: Option<DepthStage>) -> RotationState {
    match depth {
        Some(d) => {
            let active_loop = RotationLoop::containing(d.letter());
            let step = active_loop.step_of(d.letter()).unwrap_or(0);
            RotationState::new(active_loop, step)
        }
        None => RotationState::new(RotationLoop::Sri, 0),
    }
}

/// The narrow flip conditions. Anything short of a full match keeps the loop.
fn flip_target(
    prev: RotationState,
    previous_phase: Option<Phase>,
    phase: Option<Phase>,
    depth: Option<DepthStage>,
    q_code: Option<QCode>,
) -> Option<RotationLoop> {
    let (Some(prev_phase), Some(cur_phase)) = (previous_phase, phase) else {
        return None;
    };

    match prev.active_loop {
        RotationLoop::Sri => {
            let outward = prev_phase == Phase::Inner && cur_phase == Phase::Outer;
            let letter_qualifies = depth.is_some_and(|d| {
                matches!(
                    d.letter(),
                    crate::domain::models::DepthLetter::I | crate::domain::models::DepthLetter::T
                )
            });
            (outward && letter_qualifies).then_some(RotationLoop::Tcf)
        }
        RotationLoop::Tcf => {
            let inward = prev_phase == Phase::Outer && cur_phase == Phase::Inner;
            let intense = q_code.is_some_and(|q| q.is_high_intensity());
            (inward && intense).then_some(RotationLoop::Sri)
        }
    }
}
