//! Configuration model for the orchestration core.
//!
//! The numeric constants here are empirically calibrated tuning parameters.
//! The documented shape of each rule (weighted sum, hysteresis band, hard
//! minimum score) is the contract; the literal numbers are not.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub volatility: VolatilityConfig,

    #[serde(default)]
    pub descent: DescentConfig,

    #[serde(default)]
    pub promotion: PromotionConfig,

    #[serde(default)]
    pub anchor: AnchorConfig,

    #[serde(default)]
    pub topic: TopicConfig,

    #[serde(default)]
    pub expression: ExpressionConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub view_shift: ViewShiftConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to the `SQLite` database file.
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    ".tiller/tiller.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// One of: json, pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Numeric-fallback thresholds for the volatility controller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VolatilityConfig {
    /// Level gap `|h - y|` at or above which the base rank is High.
    #[serde(default = "default_gap_high")]
    pub gap_high: f64,
    /// Level mean `(h + y) / 2` at or above which the base rank is High.
    #[serde(default = "default_mean_high")]
    pub mean_high: f64,
    /// Gap tier for Mid.
    #[serde(default = "default_gap_mid")]
    pub gap_mid: f64,
    /// Mean tier for Mid.
    #[serde(default = "default_mean_mid")]
    pub mean_mid: f64,
}

fn default_gap_high() -> f64 {
    2.0
}
fn default_mean_high() -> f64 {
    4.0
}
fn default_gap_mid() -> f64 {
    1.0
}
fn default_mean_mid() -> f64 {
    3.0
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            gap_high: default_gap_high(),
            mean_high: default_mean_high(),
            gap_mid: default_gap_mid(),
            mean_mid: default_mean_mid(),
        }
    }
}

/// Weights and hysteresis thresholds for the descent gate composite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DescentConfig {
    #[serde(default = "default_code_weight")]
    pub code_weight: f64,
    #[serde(default = "default_acceptance_weight")]
    pub acceptance_weight: f64,
    #[serde(default = "default_depth_weight")]
    pub depth_weight: f64,
    /// Magnitude of the goal-kind adjustment (added for deepening goals,
    /// subtracted for expansion goals).
    #[serde(default = "default_goal_adjust")]
    pub goal_adjust: f64,
    /// Opening threshold from a closed gate.
    #[serde(default = "default_on_threshold")]
    pub on_threshold: f64,
    /// Closing threshold for an open gate; must sit below `on_threshold`.
    #[serde(default = "default_off_threshold")]
    pub off_threshold: f64,
}

fn default_code_weight() -> f64 {
    0.38
}
fn default_acceptance_weight() -> f64 {
    0.42
}
fn default_depth_weight() -> f64 {
    0.20
}
fn default_goal_adjust() -> f64 {
    0.08
}
fn default_on_threshold() -> f64 {
    0.58
}
fn default_off_threshold() -> f64 {
    0.48
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            code_weight: default_code_weight(),
            acceptance_weight: default_acceptance_weight(),
            depth_weight: default_depth_weight(),
            goal_adjust: default_goal_adjust(),
            on_threshold: default_on_threshold(),
            off_threshold: default_off_threshold(),
        }
    }
}

/// Evidence windows for stage promotion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PromotionConfig {
    /// Minimum recurrences of the same anchor key.
    #[serde(default = "default_min_repeats")]
    pub min_repeats: u32,
    /// Anti-spam spacing since the prior record, in hours.
    #[serde(default = "default_min_spacing_hours")]
    pub min_spacing_hours: i64,
    /// Evidence freshness window, in days.
    #[serde(default = "default_max_window_days")]
    pub max_window_days: i64,
}

fn default_min_repeats() -> u32 {
    3
}
fn default_min_spacing_hours() -> i64 {
    20
}
fn default_max_window_days() -> i64 {
    45
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            min_repeats: default_min_repeats(),
            min_spacing_hours: default_min_spacing_hours(),
            max_window_days: default_max_window_days(),
        }
    }
}

/// Anchor store gating parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnchorConfig {
    /// Minimum character count a candidate must carry.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    /// Maximum retained history entries; oldest dropped first.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

fn default_min_chars() -> usize {
    6
}
fn default_history_cap() -> usize {
    20
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            history_cap: default_history_cap(),
        }
    }
}

/// Topic memory eviction parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TopicConfig {
    /// Per-user cap on non-core rows that may keep a memo.
    #[serde(default = "default_memo_cap")]
    pub memo_cap: usize,
}

fn default_memo_cap() -> usize {
    12
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            memo_cap: default_memo_cap(),
        }
    }
}

/// Expression selector switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpressionConfig {
    #[serde(default = "default_expression_enabled")]
    pub enabled: bool,
}

fn default_expression_enabled() -> bool {
    true
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            enabled: default_expression_enabled(),
        }
    }
}

/// Context summarizer limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryConfig {
    /// Character budget of the reconstructed line before ellipsis.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_chars() -> usize {
    90
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

/// View-shift detector tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ViewShiftConfig {
    /// Jaccard similarity at or below which the topic fingerprint counts as
    /// changed.
    #[serde(default = "default_similarity_floor")]
    pub similarity_floor: f64,
    /// Minimum rise in abstract-vocabulary hits per clause.
    #[serde(default = "default_abstract_jump")]
    pub abstract_jump: f64,
}

fn default_similarity_floor() -> f64 {
    0.25
}
fn default_abstract_jump() -> f64 {
    0.35
}

impl Default for ViewShiftConfig {
    fn default() -> Self {
        Self {
            similarity_floor: default_similarity_floor(),
            abstract_jump: default_abstract_jump(),
        }
    }
}

/// Generator call policy. The call itself is out of scope; this bounds it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Hard timeout on a single generator call, in seconds. On expiry the
    /// turn degrades to the Forward contract; there is no retry loop.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}
