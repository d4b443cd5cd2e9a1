//! Descent gate: whether to shift into a supportive holding mode.
//!
//! A weighted composite risk score feeds an asymmetric hysteresis band:
//! opening from Closed requires clearing the higher on-threshold, while an
//! already-open gate stays open all the way down to the lower off-threshold.
//! A single noisy mid-risk turn can therefore neither open nor close the
//! gate.

use crate::domain::models::{
    DepthStage, DescentConfig, DescentDecision, DescentGate, GoalKind, QCode,
};

/// Acceptance risk tiers. Lower self-acceptance means higher risk; a
/// missing estimate is treated as medium risk, not an error.
fn acceptance_risk(self_acceptance: Option<f64>) -> f64 {
    match self_acceptance {
        None => 0.5,
        Some(a) if a < 0.3 => 1.0,
        Some(a) if a < 0.5 => 0.7,
        Some(a) if a < 0.7 => 0.45,
        Some(_) => 0.15,
    }
}

fn goal_adjustment(goal: Option<GoalKind>, magnitude: f64) -> f64 {
    match goal {
        Some(GoalKind::Deepening) => magnitude,
        Some(GoalKind::Expansion) => -magnitude,
        Some(GoalKind::Maintain) | None => 0.0,
    }
}

/// Composite risk score, clamped to 0..=1.
fn risk_score(
    q_code: Option<QCode>,
    self_acceptance: Option<f64>,
    depth: Option<DepthStage>,
    goal: Option<GoalKind>,
    config: &DescentConfig,
) -> f64 {
    // Missing inputs degrade to the documented medium-risk neutral.
    let code_risk = q_code.map_or(0.5, |q| q.descent_risk());
    let depth_risk = depth.map_or(0.5, |d| d.letter().descent_risk());

    let score = config.code_weight * code_risk
        + config.acceptance_weight * acceptance_risk(self_acceptance)
        + config.depth_weight * depth_risk
        + goal_adjustment(goal, config.goal_adjust);

    score.clamp(0.0, 1.0)
}

/// Decide this turn's gate state from the composite risk and the previous
/// gate state.
pub fn decide_descent_gate(
    q_code: Option<QCode>,
    self_acceptance: Option<f64>,
    depth: Option<DepthStage>,
    goal: Option<GoalKind>,
    previous: DescentGate,
    config: &DescentConfig,
) -> DescentDecision {
    let score = risk_score(q_code, self_acceptance, depth, goal, config);

    let gate = if previous.is_open() {
        // Sticky downward: stays open until the score falls below the
        // lower off-threshold.
        if score >= config.off_threshold {
            DescentGate::Accepted
        } else {
            DescentGate::Closed
        }
    } else if score > config.on_threshold {
        DescentGate::Offered
    } else {
        DescentGate::Closed
    };

    DescentDecision {
        gate,
        risk_score: score,
    }
}
