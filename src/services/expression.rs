//! Expression technique selector: an ordered registry of stylistic
//! techniques, each a predicate plus a one-sentence preface composer.
//!
//! The selector never alters depth, phase, rotation, or branch. It may only
//! suggest a single prepended sentence for the generator to weave in, and
//! whether post-generation polishing is allowed. Hard blocks are checked
//! first and short-circuit to "off"; otherwise the first matching technique
//! in registration order fires. Adding a technique means appending to the
//! registry, never touching existing entries.

use crate::domain::models::{
    Axis, Branch, DepthLetter, DescentGate, ExpressionPlan, ShiftVariant, VolatilityRank,
};

/// Everything a technique predicate may look at. Read-only by design.
#[derive(Debug, Clone)]
pub struct ExpressionContext {
    pub enabled: bool,
    pub hard_stall: bool,
    pub active_axis: Axis,
    pub branch: Branch,
    pub volatility_rank: VolatilityRank,
    pub descent_gate: DescentGate,
    pub shift_variant: Option<ShiftVariant>,
    pub anchor_text: Option<String>,
    /// The turn is committing evidence for the record.
    pub evidence_commit: bool,
    /// The turn is a how-to question.
    pub how_to: bool,
    /// The turn is a direct task request.
    pub task_request: bool,
}

/// One registered technique: name, match predicate, preface composer.
struct Technique {
    name: &'static str,
    matches: fn(&ExpressionContext) -> bool,
    compose: fn(&ExpressionContext) -> String,
}

/// The registry, evaluated in order; first match wins.
fn registry() -> [Technique; 4] {
    [
        Technique {
            name: "soft_landing",
            matches: |ctx| ctx.descent_gate.is_open(),
            compose: |_| "There's no rush here; we can take this slowly.".to_string(),
        },
        Technique {
            name: "tempo_hold",
            matches: |ctx| ctx.shift_variant == Some(ShiftVariant::Tempo),
            compose: |_| "Staying with the same thread for a moment.".to_string(),
        },
        Technique {
            name: "bridge_echo",
            matches: |ctx| matches!(ctx.branch, Branch::CBridge | Branch::IBridge),
            compose: |ctx| match ctx.branch {
                Branch::IBridge => "That sounded like a decision worth keeping.".to_string(),
                _ => "Something in that is asking to be made real.".to_string(),
            },
        },
        Technique {
            name: "anchor_recall",
            matches: |ctx| {
                ctx.volatility_rank == VolatilityRank::High && ctx.anchor_text.is_some()
            },
            compose: |ctx| {
                // The anchor statement is the user's own words; recalling it
                // is the one sanctioned echo.
                let anchor = ctx.anchor_text.as_deref().unwrap_or_default();
                format!("Holding on to what you named before: \"{anchor}\".")
            },
        },
    ]
}

/// True when any hard block forbids stylistic interference this turn.
fn hard_blocked(ctx: &ExpressionContext) -> bool {
    !ctx.enabled
        || ctx.hard_stall
        || ctx.active_axis == DepthLetter::C
        || ctx.evidence_commit
        || ctx.how_to
        || ctx.task_request
}

/// Select the expression plan for a turn.
pub fn select_expression(ctx: &ExpressionContext) -> ExpressionPlan {
    let allow_polish = ctx.volatility_rank != VolatilityRank::High && !ctx.descent_gate.is_open();

    if hard_blocked(ctx) {
        return ExpressionPlan {
            allow_polish,
            ..ExpressionPlan::off(ctx.active_axis)
        };
    }

    for technique in registry() {
        if (technique.matches)(ctx) {
            return ExpressionPlan {
                lane: ctx.active_axis,
                preface: Some((technique.compose)(ctx)),
                technique: Some(technique.name),
                allow_polish,
            };
        }
    }

    ExpressionPlan {
        allow_polish,
        ..ExpressionPlan::off(ctx.active_axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_ctx() -> ExpressionContext {
        ExpressionContext {
            enabled: true,
            hard_stall: false,
            active_axis: DepthLetter::S,
            branch: Branch::Unknown,
            volatility_rank: VolatilityRank::Low,
            descent_gate: DescentGate::Closed,
            shift_variant: None,
            anchor_text: None,
            evidence_commit: false,
            how_to: false,
            task_request: false,
        }
    }

    #[test]
    fn test_disabled_feature_blocks_everything() {
        let ctx = ExpressionContext {
            enabled: false,
            descent_gate: DescentGate::Accepted,
            ..base_ctx()
        };
        let plan = select_expression(&ctx);
        assert!(plan.preface.is_none());
        assert!(plan.technique.is_none());
    }

    #[test]
    fn test_concretize_axis_never_gets_prefaces() {
        let ctx = ExpressionContext {
            active_axis: DepthLetter::C,
            descent_gate: DescentGate::Accepted,
            ..base_ctx()
        };
        let plan = select_expression(&ctx);
        assert!(plan.preface.is_none());
        assert_eq!(plan.lane, DepthLetter::C);
    }

    #[test]
    fn test_task_shaped_turns_are_blocked() {
        for ctx in [
            ExpressionContext { evidence_commit: true, ..base_ctx() },
            ExpressionContext { how_to: true, ..base_ctx() },
            ExpressionContext { task_request: true, ..base_ctx() },
            ExpressionContext { hard_stall: true, ..base_ctx() },
        ] {
            let plan = select_expression(&ctx);
            assert!(plan.preface.is_none());
        }
    }

    #[test]
    fn test_first_match_wins_in_registry_order() {
        // Both soft_landing and bridge_echo would match; the earlier one fires.
        let ctx = ExpressionContext {
            descent_gate: DescentGate::Offered,
            branch: Branch::CBridge,
            ..base_ctx()
        };
        let plan = select_expression(&ctx);
        assert_eq!(plan.technique, Some("soft_landing"));
    }

    #[test]
    fn test_tempo_hold_fires_on_tempo_shift() {
        let ctx = ExpressionContext {
            shift_variant: Some(ShiftVariant::Tempo),
            ..base_ctx()
        };
        let plan = select_expression(&ctx);
        assert_eq!(plan.technique, Some("tempo_hold"));
        assert!(plan.preface.is_some());
    }

    #[test]
    fn test_anchor_recall_needs_both_conditions() {
        let without_anchor = ExpressionContext {
            volatility_rank: VolatilityRank::High,
            ..base_ctx()
        };
        assert!(select_expression(&without_anchor).technique.is_none());

        let with_anchor = ExpressionContext {
            volatility_rank: VolatilityRank::High,
            anchor_text: Some("run a small bakery".to_string()),
            ..base_ctx()
        };
        let plan = select_expression(&with_anchor);
        assert_eq!(plan.technique, Some("anchor_recall"));
        assert!(plan.preface.unwrap().contains("run a small bakery"));
    }

    #[test]
    fn test_no_match_is_off() {
        let plan = select_expression(&base_ctx());
        assert!(plan.preface.is_none());
        assert!(plan.technique.is_none());
        assert!(plan.allow_polish);
    }

    #[test]
    fn test_polish_disabled_under_high_volatility_or_open_gate() {
        let high = ExpressionContext {
            volatility_rank: VolatilityRank::High,
            ..base_ctx()
        };
        assert!(!select_expression(&high).allow_polish);

        let open = ExpressionContext {
            descent_gate: DescentGate::Accepted,
            ..base_ctx()
        };
        assert!(!select_expression(&open).allow_polish);
    }

    #[test]
    fn test_preface_is_single_sentence() {
        let ctx = ExpressionContext {
            descent_gate: DescentGate::Offered,
            ..base_ctx()
        };
        let preface = select_expression(&ctx).preface.unwrap();
        // One sentence: exactly one terminal period.
        assert_eq!(preface.matches('.').count(), 1);
    }
}
