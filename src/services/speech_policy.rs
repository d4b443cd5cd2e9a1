//! Speech policy gate: the single source of truth for whether a turn may
//! reach the generator at all.
//!
//! The rules run in a fixed order and the first match wins. Suppression
//! verdicts carry a fixed, input-independent text: the FORWARD token never
//! interpolates the user's words, which closes off the echo/contamination
//! class of bugs where suppressed turns leaked user text back out.
//!
//! Hard invariant, enforced by the `SpeechPolicy` constructors: whenever
//! `allow_llm` is false, `should_persist_assistant` is false. A suppressed
//! turn never enters durable history.

use tracing::debug;

use crate::domain::models::{
    BrakeSignal, DerivedAct, InputKind, SpeechPolicy, SuppressionMeta, SuppressionRule, TurnAct,
};

/// Fixed placeholder for a silenced turn.
pub const SILENCE_TEXT: &str = "……";

/// Fixed forward token. Deliberately constant: it must be identical for
/// every input so that no user text can echo through a suppressed turn.
pub const FORWARD_TEXT: &str = "——";

/// Decide the speech policy for a turn.
pub fn decide_speech(
    user_text: &str,
    brake_reason: Option<&str>,
    derived: &DerivedAct,
) -> SpeechPolicy {
    let input_kind = InputKind::classify(user_text);
    let brake = BrakeSignal::normalize(brake_reason);

    // Rule 1: genuinely empty input is silence.
    if input_kind == InputKind::Empty {
        debug!(rule = "empty_input", "speech suppressed");
        return SpeechPolicy::suppressed(
            TurnAct::Silence,
            SILENCE_TEXT,
            SuppressionMeta {
                rule: SuppressionRule::EmptyInput,
                input_kind,
                reason: None,
            },
        );
    }

    // Rule 2: a soft hold combined with a micro input.
    if brake == BrakeSignal::SoftHold && input_kind == InputKind::Micro {
        debug!(rule = "micro_under_hold", "speech suppressed");
        return SpeechPolicy::suppressed(
            TurnAct::Silence,
            SILENCE_TEXT,
            SuppressionMeta {
                rule: SuppressionRule::MicroUnderHold,
                input_kind,
                reason: brake_reason.map(|r| r.trim().to_string()),
            },
        );
    }

    // Rule 3: explicit no-mirror suppression, whatever the input.
    if brake == BrakeSignal::NoMirror {
        debug!(rule = "no_mirror", "speech suppressed");
        return SpeechPolicy::suppressed(
            TurnAct::Forward,
            FORWARD_TEXT,
            SuppressionMeta {
                rule: SuppressionRule::NoMirror,
                input_kind,
                reason: brake_reason.map(|r| r.trim().to_string()),
            },
        );
    }

    // Rule 4: pass through under the upstream-derived act.
    SpeechPolicy::pass(derived.act)
}
