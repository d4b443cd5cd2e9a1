//! Branch selection: signals + context + depth/phase to one discrete
//! conversational branch.
//!
//! Priority order is fixed. The key anti-regression rule: a short current
//! utterance must not discard a rich recent context, so a `detail` signal
//! downgrades to `Stabilize` whenever the reconstructed context is rich.

use crate::domain::models::{Branch, DepthStage, Phase, TurnSignals};

use super::context_summarizer::ContextLine;
use super::signal_extractor::{looks_like_commitment, looks_like_self_consult};

/// Select the turn's branch.
pub fn select_branch(
    signals: &TurnSignals,
    context: &ContextLine,
    user_text: &str,
    depth: Option<DepthStage>,
    phase: Option<Phase>,
) -> Branch {
    // Repair always wins: the user is correcting our memory.
    if signals.repair {
        return Branch::Repair;
    }

    let relational = depth.is_some_and(|d| d.letter().is_relational());
    if relational && looks_like_self_consult(user_text) {
        return Branch::CBridge;
    }

    if signals.detail {
        // A short ambiguous utterance on top of a rich context is a
        // continuation, not a void.
        if context.is_rich() {
            return Branch::Stabilize;
        }
        return Branch::Detail;
    }

    if signals.stuck {
        return Branch::Stabilize;
    }

    let bridge_band = depth.is_some_and(|d| d.letter().is_bridge_band());
    if bridge_band && phase.is_some() && looks_like_commitment(user_text) {
        return Branch::IBridge;
    }

    Branch::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SummaryConfig;
    use crate::services::context_summarizer::summarize_context;
    use crate::services::signal_extractor::extract_signals;

    fn context_from(lines: &[&str]) -> ContextLine {
        let owned: Vec<String> = lines.iter().map(|s| (*s).to_string()).collect();
        summarize_context(&owned, None, None, &SummaryConfig::default())
    }

    fn depth(symbol: &str) -> Option<DepthStage> {
        Some(DepthStage::parse(symbol).unwrap())
    }

    #[test]
    fn test_repair_wins_over_everything() {
        let text = "you already said that, それ";
        let signals = extract_signals(text);
        let branch = select_branch(
            &signals,
            &context_from(&["a", "b", "c"]),
            text,
            depth("R1"),
            Some(Phase::Inner),
        );
        assert_eq!(branch, Branch::Repair);
    }

    #[test]
    fn test_short_ambiguous_utterance_with_rich_context_stabilizes() {
        let text = "それ";
        let signals = extract_signals(text);
        assert!(signals.detail);
        let context = context_from(&[
            "I keep thinking about opening the bakery",
            "maybe in spring",
        ]);
        assert!(context.is_rich());
        let branch = select_branch(&signals, &context, text, depth("S1"), Some(Phase::Inner));
        assert_eq!(branch, Branch::Stabilize);
    }

    #[test]
    fn test_short_ambiguous_utterance_with_thin_context_asks_for_detail() {
        let text = "それ";
        let signals = extract_signals(text);
        let context = context_from(&[]);
        let branch = select_branch(&signals, &context, text, depth("S1"), Some(Phase::Inner));
        assert_eq!(branch, Branch::Detail);
    }

    #[test]
    fn test_self_consult_in_relational_band_bridges_to_creation() {
        let text = "どうしよう、決められない";
        let signals = extract_signals(text);
        let branch = select_branch(&signals, &context_from(&[]), text, depth("R2"), None);
        assert_eq!(branch, Branch::CBridge);
    }

    #[test]
    fn test_self_consult_outside_relational_band_does_not_bridge() {
        let text = "どうしよう、決められない";
        let signals = extract_signals(text);
        let branch = select_branch(&signals, &context_from(&[]), text, depth("S1"), None);
        assert_eq!(branch, Branch::Unknown);
    }

    #[test]
    fn test_stuck_stabilizes() {
        let text = "また同じところにいる";
        let signals = extract_signals(text);
        let branch = select_branch(&signals, &context_from(&[]), text, depth("S1"), None);
        assert_eq!(branch, Branch::Stabilize);
    }

    #[test]
    fn test_commitment_in_creation_band_with_known_phase_bridges_to_intent() {
        let text = "決めた。パン屋をやる";
        let signals = extract_signals(text);
        let branch = select_branch(
            &signals,
            &context_from(&[]),
            text,
            depth("C2"),
            Some(Phase::Outer),
        );
        assert_eq!(branch, Branch::IBridge);
    }

    #[test]
    fn test_commitment_without_phase_stays_unknown() {
        let text = "決めた。パン屋をやる";
        let signals = extract_signals(text);
        let branch = select_branch(&signals, &context_from(&[]), text, depth("C2"), None);
        assert_eq!(branch, Branch::Unknown);
    }

    #[test]
    fn test_no_signal_is_unknown() {
        let text = "the weather was nice today";
        let signals = extract_signals(text);
        let branch = select_branch(&signals, &context_from(&[]), text, None, None);
        assert_eq!(branch, Branch::Unknown);
    }
}
