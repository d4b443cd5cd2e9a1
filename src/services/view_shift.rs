//! View-shift detection: has the user's focus moved, and how strongly.
//!
//! Four independent sub-signals are summed into a 0..=4 score. No single
//! signal may trigger a shift alone; `ok` requires a score of at least 2.
//! That is a hard design rule, not a tunable default. A session break
//! disables the whole detector, because a break already resets context
//! explicitly elsewhere.

use std::collections::HashSet;

use crate::domain::models::{
    ConversationSnapshot, ShiftVariant, ViewShift, ViewShiftConfig,
};

/// Abstract vocabulary whose density marks a move toward meaning-talk.
const ABSTRACT_VOCAB: &[&str] = &[
    "meaning",
    "truth",
    "purpose",
    "essence",
    "really matters",
    "why am i",
    "意味",
    "本質",
    "真実",
    "目的",
    "価値",
    "生きる",
    "自分とは",
];

/// Tokens too common to identify a topic.
const FINGERPRINT_STOPWORDS: &[&str] = &[
    "the", "and", "but", "for", "with", "that", "this", "what", "about", "just", "like",
    "have", "was", "are", "not", "you", "its",
];

const TEMPO_LINE: &str = "Just checking in: are we still on the same thread?";
const BASIC_LINE: &str = "The focus seems to have moved a little. Shall we follow it?";
const PRESENCE_LINE: &str = "Something shifted in how this feels. Want to stay with that?";
const BRANCH_LINE: &str = "This feels like new territory. Should we move with it?";

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}' |   // hiragana, katakana
        '\u{3400}'..='\u{4dbf}' |
        '\u{4e00}'..='\u{9fff}' |
        '\u{f900}'..='\u{faff}'
    )
}

/// Coarse topic fingerprint: salient multi-character tokens.
///
/// Spaced text contributes lowercased tokens of 3+ characters minus
/// stopwords; unspaced CJK runs contribute character bigrams so Japanese
/// input fingerprints without a tokenizer.
fn fingerprint(text: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();

    for raw in text.split_whitespace() {
        let cleaned: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || is_cjk(*c))
            .collect();
        if cleaned.is_empty() {
            continue;
        }
        let (cjk, rest): (String, String) = cleaned.chars().partition(|c| is_cjk(*c));
        if rest.chars().count() >= 3 && !FINGERPRINT_STOPWORDS.contains(&rest.as_str()) {
            tokens.insert(rest);
        }
        let cjk_chars: Vec<char> = cjk.chars().collect();
        for pair in cjk_chars.windows(2) {
            tokens.insert(pair.iter().collect());
        }
    }

    tokens
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Clause count for the abstract-density ratio. Never returns zero.
fn clause_count(text: &str) -> usize {
    let count = text
        .split(['。', '．', '.', '!', '！', '?', '？', '、', ',', ';', '；'])
        .filter(|clause| !clause.trim().is_empty())
        .count();
    count.max(1)
}

/// Abstract-vocabulary hits per clause.
fn abstract_ratio(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let hits: usize = ABSTRACT_VOCAB
        .iter()
        .map(|word| lower.matches(word).count())
        .sum();
    hits as f64 / clause_count(&lower) as f64
}

/// Detect whether the user's focus has moved versus the previous turn.
pub fn detect_view_shift(
    current: &ConversationSnapshot,
    previous: Option<&ConversationSnapshot>,
    config: &ViewShiftConfig,
) -> ViewShift {
    // A break already reset context; do not also report a shift.
    if current.session_break {
        return ViewShift::none();
    }
    let Some(previous) = previous else {
        return ViewShift::none();
    };

    let depth_changed = match (current.depth, previous.depth) {
        (Some(cur), Some(prev)) => cur.letter() != prev.letter(),
        _ => false,
    };

    let energy_delta = match (current.energy, previous.energy) {
        (Some(cur), Some(prev)) => cur.delta(prev),
        _ => 0,
    };
    let energy_changed = energy_delta >= 1;

    let current_fp = fingerprint(&current.user_text);
    let previous_fp = fingerprint(&previous.user_text);
    let topic_changed = !current_fp.is_empty()
        && !previous_fp.is_empty()
        && jaccard(&current_fp, &previous_fp) <= config.similarity_floor;

    let abstract_jumped =
        abstract_ratio(&current.user_text) - abstract_ratio(&previous.user_text)
            >= config.abstract_jump;

    let score = u8::from(depth_changed)
        + u8::from(energy_changed)
        + u8::from(topic_changed)
        + u8::from(abstract_jumped);

    if score < 2 {
        return ViewShift {
            ok: false,
            score,
            variant: None,
            confirm_line: None,
        };
    }

    let variant = if score >= 4 || (energy_delta >= 2 && depth_changed) {
        ShiftVariant::Branch
    } else if score == 3 {
        ShiftVariant::Presence
    } else if !depth_changed && !topic_changed {
        ShiftVariant::Tempo
    } else {
        ShiftVariant::Basic
    };

    let confirm_line = match variant {
        ShiftVariant::Tempo => TEMPO_LINE,
        ShiftVariant::Basic => BASIC_LINE,
        ShiftVariant::Presence => PRESENCE_LINE,
        ShiftVariant::Branch => BRANCH_LINE,
    };

    ViewShift {
        ok: true,
        score,
        variant: Some(variant),
        confirm_line: Some(confirm_line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DepthStage, EnergyLevel};

    fn snapshot(text: &str, depth: &str, energy: EnergyLevel) -> ConversationSnapshot {
        ConversationSnapshot::new(text)
            .with_depth(DepthStage::parse(depth).unwrap())
            .with_energy(energy)
    }

    #[test]
    fn test_session_break_disables_detector() {
        let previous = snapshot("planning the bakery menu", "S1", EnergyLevel::E2);
        let current = snapshot("why does anything have meaning at all", "C3", EnergyLevel::E5)
            .with_session_break(true);
        let shift = detect_view_shift(&current, Some(&previous), &ViewShiftConfig::default());
        assert!(!shift.ok);
        assert_eq!(shift.score, 0);
        assert!(shift.variant.is_none());
    }

    #[test]
    fn test_no_previous_snapshot_means_no_shift() {
        let current = snapshot("anything", "S1", EnergyLevel::E1);
        let shift = detect_view_shift(&current, None, &ViewShiftConfig::default());
        assert!(!shift.ok);
    }

    #[test]
    fn test_single_signal_never_triggers() {
        // Depth letter changed, everything else held steady.
        let previous = snapshot("the bakery opening plan", "S1", EnergyLevel::E2);
        let current = snapshot("the bakery opening plan", "R1", EnergyLevel::E2);
        let shift = detect_view_shift(&current, Some(&previous), &ViewShiftConfig::default());
        assert_eq!(shift.score, 1);
        assert!(!shift.ok);
    }

    #[test]
    fn test_two_signals_trigger_basic() {
        // Depth and topic both change; energy steady, no abstract jump.
        let previous = snapshot("bakery sourdough starters rising", "S1", EnergyLevel::E2);
        let current = snapshot("mountain weather hiking forecast", "R1", EnergyLevel::E2);
        let shift = detect_view_shift(&current, Some(&previous), &ViewShiftConfig::default());
        assert_eq!(shift.score, 2);
        assert!(shift.ok);
        assert_eq!(shift.variant, Some(ShiftVariant::Basic));
        assert!(shift.confirm_line.is_some());
    }

    #[test]
    fn test_tempo_variant_when_ground_held() {
        // Energy moved and abstract density jumped, but depth and topic held.
        let previous = snapshot("bakery plan bakery plan", "S1", EnergyLevel::E1);
        let current = snapshot(
            "bakery plan, what is the meaning, the purpose",
            "S2",
            EnergyLevel::E2,
        );
        let shift = detect_view_shift(&current, Some(&previous), &ViewShiftConfig::default());
        assert_eq!(shift.score, 2);
        assert_eq!(shift.variant, Some(ShiftVariant::Tempo));
    }

    #[test]
    fn test_branch_variant_on_energy_spike_with_depth_change() {
        // Energy delta of 2+ with a depth change forces Branch even at 3.
        let previous = snapshot("bakery sourdough starters rising", "S1", EnergyLevel::E1);
        let current = snapshot("mountain weather hiking forecast", "T1", EnergyLevel::E4);
        let shift = detect_view_shift(&current, Some(&previous), &ViewShiftConfig::default());
        assert!(shift.ok);
        assert_eq!(shift.variant, Some(ShiftVariant::Branch));
    }

    #[test]
    fn test_cjk_fingerprint_detects_topic_change() {
        let a = fingerprint("パン屋の開店準備について");
        let b = fingerprint("山の天気と登山の予定");
        assert!(jaccard(&a, &b) <= 0.25);
        let c = fingerprint("パン屋の開店準備の続き");
        assert!(jaccard(&a, &c) > 0.25);
    }

    #[test]
    fn test_abstract_ratio_counts_hits_per_clause() {
        assert!(abstract_ratio("意味とは何か。本質は何か。") > 0.5);
        assert!(abstract_ratio("the bread is in the oven") < f64::EPSILON);
    }
}
