//! The per-turn decision pipeline: raw text plus the previous turn's
//! persisted projection, bottom-up through every decision component, out to
//! a single `TurnDecision`.
//!
//! Everything here is pure and synchronous. The pipeline never fails: every
//! component is total, and a missing optional input degrades to its
//! documented neutral value. When the speech policy gate suppresses the
//! turn, the expression selector is skipped (the plan is "off"), but the
//! structural state (rotation, volatility, gate) is still computed so the
//! projection can be carried forward.

use tracing::debug;

use crate::domain::models::{Config, ExpressionPlan, TurnDecision, TurnInput, TurnProjection};

use super::branch_selector::select_branch;
use super::context_summarizer::summarize_context;
use super::descent_gate::decide_descent_gate;
use super::expression::{select_expression, ExpressionContext};
use super::rotation_engine::rotate;
use super::signal_extractor::{
    extract_signals, is_evidence_commit, is_how_to_question, is_task_request,
};
use super::speech_policy::decide_speech;
use super::view_shift::detect_view_shift;
use super::volatility_control::control_volatility;

/// Compute the full decision for one turn.
pub fn decide_turn(input: &TurnInput, projection: &TurnProjection, config: &Config) -> TurnDecision {
    let text = input.snapshot.user_text.as_str();

    let signals = extract_signals(text);

    let context = summarize_context(
        &input.recent_user_texts,
        input.last_assistant_text.as_deref(),
        projection.durable_summary.as_deref(),
        &config.summary,
    );

    let view_shift = detect_view_shift(
        &input.snapshot,
        projection.prev_snapshot.as_ref(),
        &config.view_shift,
    );

    let branch = select_branch(
        &signals,
        &context,
        text,
        input.snapshot.depth,
        input.snapshot.phase,
    );

    let speech = decide_speech(text, input.brake_reason.as_deref(), &input.derived);

    let rotation = rotate(
        projection.prev_rotation,
        projection.prev_snapshot.as_ref().and_then(|s| s.phase),
        input.snapshot.phase,
        input.snapshot.depth,
        input.snapshot.q_code,
        speech.act,
    );

    let volatility = control_volatility(
        input.stability_band,
        input.raw_levels,
        projection.prev_volatility,
        &config.volatility,
    );

    let descent = decide_descent_gate(
        input.snapshot.q_code,
        input.self_acceptance,
        input.snapshot.depth,
        input.goal_kind,
        projection.prev_gate,
        &config.descent,
    );

    // A suppressed or spin-suppressed turn gets no stylistic interference.
    let expression = if speech.is_suppressed() || rotation.suppress_spin {
        ExpressionPlan::off(rotation.state.active_axis())
    } else {
        select_expression(&ExpressionContext {
            enabled: config.expression.enabled,
            hard_stall: input.hard_stall,
            active_axis: rotation.state.active_axis(),
            branch,
            volatility_rank: volatility.rank,
            descent_gate: descent.gate,
            shift_variant: view_shift.variant,
            anchor_text: projection.anchor_text.clone(),
            evidence_commit: is_evidence_commit(text),
            how_to: is_how_to_question(text),
            task_request: is_task_request(text),
        })
    };

    debug!(
        branch = branch.as_str(),
        rank = volatility.rank.as_str(),
        gate = descent.gate.as_str(),
        act = speech.act.as_str(),
        suppressed = speech.is_suppressed(),
        "turn decided"
    );

    TurnDecision {
        branch,
        rotation,
        volatility,
        descent_gate: descent.gate,
        speech,
        expression,
        view_shift,
        context_line: context.line,
        signals,
    }
}
