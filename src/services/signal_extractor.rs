//! Signal extraction: raw user text to structured boolean/string signals.
//!
//! Pattern lists cover both Japanese and English phrasings; the production
//! deployment is bilingual. Everything here is pure, total, and idempotent:
//! arbitrary input, including the empty string, yields a well-formed
//! `TurnSignals`.
//!
//! The core design decision is the `detail` asymmetry: under-triggering is
//! safer than over-triggering, because a false `detail` causes the branch
//! selector to discard usable context. Short *labeled* statements (a brief
//! noun phrase closed with a politeness marker) therefore never fire it.

use crate::domain::models::TurnSignals;

/// "You already said this / you forgot" complaints.
const REPAIR_PATTERNS: &[&str] = &[
    "you already said",
    "you said that",
    "you just said",
    "you forgot",
    "i already told you",
    "you're repeating",
    "さっき言った",
    "さっきも言った",
    "もう言った",
    "前に話した",
    "忘れたの",
    "同じこと言ってる",
];

/// Loop language: the conversation is going in circles.
const STUCK_PATTERNS: &[&str] = &[
    "same thing again",
    "going in circles",
    "we keep coming back",
    "not getting anywhere",
    "また同じ",
    "堂々巡り",
    "ぐるぐる",
    "進まない",
    "また振り出し",
];

/// Short negations that count as stuck on their own.
const STUCK_NEGATIONS: &[&str] = &[
    "no", "nope", "not really", "いや", "違う", "ちがう", "うーん", "そうじゃない",
];

/// Bare pronouns: referents without content.
const BARE_PRONOUNS: &[&str] = &[
    "それ", "あれ", "これ", "that", "this", "it", "that one", "それが", "それは",
];

/// Bare acknowledgements.
const BARE_ACKS: &[&str] = &[
    "ok", "okay", "yes", "yeah", "sure", "うん", "はい", "そう", "なるほど", "了解",
];

/// "Don't know" in its usual forms.
const DONT_KNOW: &[&str] = &[
    "i don't know",
    "dont know",
    "dunno",
    "idk",
    "no idea",
    "わからない",
    "分からない",
    "わかんない",
    "知らない",
];

/// Politeness markers that label an otherwise short statement. Text closed
/// with one of these carries restorable context and must not fire `detail`.
const POLITE_SUFFIXES: &[&str] = &["です", "ます", "でした", "ですね", "please", "お願いします"];

/// Self-consultation phrasing ("what should I do").
const SELF_CONSULT_PATTERNS: &[&str] = &[
    "should i",
    "what should i do",
    "what do i do",
    "どうしよう",
    "どうすれば",
    "どうしたら",
    "迷って",
    "悩んで",
];

/// Spoken decision / commitment phrasing.
const COMMITMENT_PATTERNS: &[&str] = &[
    "i've decided",
    "i have decided",
    "i'm going to",
    "i will do",
    "決めた",
    "決めました",
    "やります",
    "やることにした",
    "始めます",
    "始めることにした",
];

/// How-to question phrasing.
const HOW_TO_PATTERNS: &[&str] = &[
    "how do i",
    "how to",
    "how can i",
    "やり方",
    "方法を",
    "どうやって",
];

/// Direct task request phrasing.
const TASK_REQUEST_PATTERNS: &[&str] = &[
    "please write",
    "please make",
    "can you write",
    "can you make",
    "してください",
    "作って",
    "書いて",
    "教えて",
    "まとめて",
];

/// Evidence-commit phrasing: the user is committing a fact for the record.
const EVIDENCE_COMMIT_PATTERNS: &[&str] = &[
    "for the record",
    "remember this",
    "覚えておいて",
    "記録して",
    "メモして",
];

/// Tokens never worth a topic hint.
const HINT_STOPWORDS: &[&str] = &[
    "the", "and", "but", "with", "that", "this", "what", "about", "just", "like", "have",
    "thing", "something",
];

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}

fn matches_any(trimmed: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| trimmed == *p)
}

/// Strip trailing punctuation the lists do not carry.
fn strip_terminal_punct(s: &str) -> &str {
    s.trim_end_matches(['。', '.', '!', '！', '?', '？', '、', ',', '…', ' '])
}

/// True when the text is a short statement closed with a politeness marker.
fn is_labeled_statement(trimmed: &str) -> bool {
    let chars = trimmed.chars().count();
    if chars == 0 || chars > 12 {
        return false;
    }
    let lower = trimmed.to_lowercase();
    POLITE_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

/// Extract the per-turn signals from one utterance.
pub fn extract_signals(text: &str) -> TurnSignals {
    let trimmed = strip_terminal_punct(text.trim());
    if trimmed.is_empty() {
        return TurnSignals::default();
    }
    let lower = trimmed.to_lowercase();

    let repair = contains_any(&lower, REPAIR_PATTERNS);
    let stuck = matches_any(lower.as_str(), STUCK_NEGATIONS) || contains_any(&lower, STUCK_PATTERNS);

    // Labeled short statements carry restorable context; never low-information.
    let detail = !is_labeled_statement(trimmed)
        && (matches_any(lower.as_str(), BARE_PRONOUNS)
            || matches_any(lower.as_str(), BARE_ACKS)
            || matches_any(lower.as_str(), DONT_KNOW)
            || contains_any(&lower, DONT_KNOW) && lower.chars().count() <= 12);

    TurnSignals {
        repair,
        stuck,
        detail,
        topic_hint: extract_topic_hint(trimmed, detail),
    }
}

/// Lift a salient topic token out of the utterance, when one exists.
///
/// Spaced text contributes its longest non-stopword token; an unspaced CJK
/// run of reasonable size contributes itself with any politeness suffix
/// removed. Low-information turns never produce a hint.
fn extract_topic_hint(trimmed: &str, detail: bool) -> Option<String> {
    if detail {
        return None;
    }

    if trimmed.contains(char::is_whitespace) {
        let lower = trimmed.to_lowercase();
        return lower
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| t.chars().count() >= 4)
            .filter(|t| !HINT_STOPWORDS.contains(t))
            .max_by_key(|t| t.chars().count())
            .map(String::from);
    }

    let mut core = trimmed;
    for suffix in POLITE_SUFFIXES {
        if let Some(stripped) = core.strip_suffix(suffix) {
            core = stripped;
            break;
        }
    }
    let chars = core.chars().count();
    if (2..=12).contains(&chars) && !matches_any(&core.to_lowercase(), BARE_ACKS) {
        Some(core.to_string())
    } else {
        None
    }
}

/// Self-consultation-like utterance ("what should I do").
pub fn looks_like_self_consult(text: &str) -> bool {
    contains_any(&text.trim().to_lowercase(), SELF_CONSULT_PATTERNS)
}

/// Explicit decision/commitment utterance.
pub fn looks_like_commitment(text: &str) -> bool {
    contains_any(&text.trim().to_lowercase(), COMMITMENT_PATTERNS)
}

/// How-to question.
pub fn is_how_to_question(text: &str) -> bool {
    contains_any(&text.trim().to_lowercase(), HOW_TO_PATTERNS)
}

/// Direct task request.
pub fn is_task_request(text: &str) -> bool {
    contains_any(&text.trim().to_lowercase(), TASK_REQUEST_PATTERNS)
}

/// The user is committing evidence for the record.
pub fn is_evidence_commit(text: &str) -> bool {
    contains_any(&text.trim().to_lowercase(), EVIDENCE_COMMIT_PATTERNS)
}
