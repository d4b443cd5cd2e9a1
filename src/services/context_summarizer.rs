//! Context reconstruction: recent turns to a one-line "what are we talking
//! about" string.
//!
//! Repository state wins: a non-empty durable summary is preferred verbatim
//! over on-the-fly reconstruction. Synthesis stitches recent *user*
//! utterances (deduplicated, most-recent-last) and only falls back to the
//! assistant's last line when the user said nothing usable.

use serde::{Deserialize, Serialize};

use crate::domain::models::SummaryConfig;

/// Where the reconstructed line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Durable,
    UserStitch,
    AssistantFallback,
    Empty,
}

/// The reconstructed context line plus enough provenance for the branch
/// selector's richness judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLine {
    pub line: String,
    pub source: ContextSource,
    /// How many distinct user utterances were stitched together.
    pub stitched_count: usize,
}

impl ContextLine {
    /// A context is rich when it carries non-trivial length or stitches
    /// multiple utterances. A rich context downgrades a `detail` verdict to
    /// `Stabilize` in the branch selector.
    pub fn is_rich(&self) -> bool {
        self.stitched_count >= 2 || self.line.chars().count() >= 24
    }
}

/// Char-aware truncation with a trailing ellipsis.
fn ellipsize(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Reconstruct the context line for this turn.
///
/// `recent_user` holds up to the 3 most recent user utterances, oldest
/// first. Extra entries beyond three are ignored from the front.
pub fn summarize_context(
    recent_user: &[String],
    last_assistant: Option<&str>,
    durable_summary: Option<&str>,
    config: &SummaryConfig,
) -> ContextLine {
    if let Some(summary) = durable_summary {
        let trimmed = summary.trim();
        if !trimmed.is_empty() {
            return ContextLine {
                line: ellipsize(trimmed, config.max_chars),
                source: ContextSource::Durable,
                stitched_count: 0,
            };
        }
    }

    let window: Vec<&String> = recent_user.iter().rev().take(3).collect();
    let mut stitched: Vec<&str> = Vec::new();
    // Walk oldest-first so the most recent utterance lands last.
    for text in window.into_iter().rev() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if stitched.contains(&trimmed) {
            continue;
        }
        stitched.push(trimmed);
    }

    if !stitched.is_empty() {
        let count = stitched.len();
        return ContextLine {
            line: ellipsize(&stitched.join(" / "), config.max_chars),
            source: ContextSource::UserStitch,
            stitched_count: count,
        };
    }

    if let Some(assistant) = last_assistant {
        let trimmed = assistant.trim();
        if !trimmed.is_empty() {
            return ContextLine {
                line: ellipsize(trimmed, config.max_chars),
                source: ContextSource::AssistantFallback,
                stitched_count: 0,
            };
        }
    }

    ContextLine {
        line: String::new(),
        source: ContextSource::Empty,
        stitched_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SummaryConfig {
        SummaryConfig::default()
    }

    #[test]
    fn test_durable_summary_wins_verbatim() {
        let context = summarize_context(
            &["something recent".to_string()],
            Some("assistant line"),
            Some("we were planning the bakery opening"),
            &config(),
        );
        assert_eq!(context.source, ContextSource::Durable);
        assert_eq!(context.line, "we were planning the bakery opening");
    }

    #[test]
    fn test_blank_durable_summary_is_ignored() {
        let context = summarize_context(
            &["recent words".to_string()],
            None,
            Some("   "),
            &config(),
        );
        assert_eq!(context.source, ContextSource::UserStitch);
    }

    #[test]
    fn test_stitches_user_utterances_most_recent_last() {
        let recent = vec![
            "first thought".to_string(),
            "second thought".to_string(),
            "third thought".to_string(),
        ];
        let context = summarize_context(&recent, None, None, &config());
        assert_eq!(context.line, "first thought / second thought / third thought");
        assert_eq!(context.stitched_count, 3);
        assert!(context.is_rich());
    }

    #[test]
    fn test_deduplicates_repeated_utterances() {
        let recent = vec![
            "same words".to_string(),
            "same words".to_string(),
            "new words".to_string(),
        ];
        let context = summarize_context(&recent, None, None, &config());
        assert_eq!(context.line, "same words / new words");
        assert_eq!(context.stitched_count, 2);
    }

    #[test]
    fn test_assistant_fallback_when_user_window_empty() {
        let context = summarize_context(
            &[String::new(), "  ".to_string()],
            Some("the assistant's last line"),
            None,
            &config(),
        );
        assert_eq!(context.source, ContextSource::AssistantFallback);
        assert_eq!(context.line, "the assistant's last line");
    }

    #[test]
    fn test_empty_everything_yields_empty_line() {
        let context = summarize_context(&[], None, None, &config());
        assert_eq!(context.source, ContextSource::Empty);
        assert!(context.line.is_empty());
        assert!(!context.is_rich());
    }

    #[test]
    fn test_ellipsizes_over_budget() {
        let long = "long ".repeat(40);
        let context = summarize_context(&[long], None, None, &config());
        assert!(context.line.chars().count() <= 90);
        assert!(context.line.ends_with('…'));
    }

    #[test]
    fn test_only_three_most_recent_stitched() {
        let recent = vec![
            "one".to_string(),
            "two".to_string(),
            "three".to_string(),
            "four".to_string(),
        ];
        let context = summarize_context(&recent, None, None, &config());
        assert_eq!(context.line, "two / three / four");
    }

    #[test]
    fn test_short_single_utterance_is_not_rich() {
        let context = summarize_context(&["それな".to_string()], None, None, &config());
        assert!(!context.is_rich());
    }
}
