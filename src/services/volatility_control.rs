//! Volatility controller: hysteresis-smoothed instability rank.
//!
//! The previous rank is the only memory this component carries, passed in
//! explicitly each turn. A band-based mapping is preferred when upstream
//! supplies one; otherwise two raw intensity levels drive a numeric
//! fallback. The smoothing rule: `Low` is only accepted when the previous
//! rank was already `Low` (or there is no previous rank at all, as after a
//! session boundary). High can therefore never drop straight to Low, and
//! the first calm reading after instability lands on Mid.

use crate::domain::models::{
    Direction, PromptStyle, StabilityBand, VolatilityConfig, VolatilityRank, VolatilityState,
};

/// Compute this turn's volatility verdict.
pub fn control_volatility(
    band: Option<StabilityBand>,
    raw_levels: Option<(u8, u8)>,
    previous: Option<VolatilityRank>,
    config: &VolatilityConfig,
) -> VolatilityState {
    let base = base_rank(band, raw_levels, config);
    let rank = smooth(base, previous);

    let direction = if rank == VolatilityRank::High {
        Direction::Brake
    } else {
        Direction::Forward
    };

    let prompt_style = match rank {
        VolatilityRank::Low => PromptStyle::OneStep,
        VolatilityRank::Mid => PromptStyle::TwoChoice,
        VolatilityRank::High => PromptStyle::SafetyBrake,
    };

    VolatilityState {
        rank,
        direction,
        prompt_style,
        should_confirm_anchor: rank == VolatilityRank::High,
    }
}

/// Base rank before hysteresis. Band wins; levels are the fallback; with
/// neither available the documented neutral is Mid.
fn base_rank(
    band: Option<StabilityBand>,
    raw_levels: Option<(u8, u8)>,
    config: &VolatilityConfig,
) -> VolatilityRank {
    if let Some(band) = band {
        return match band {
            StabilityBand::Stable => VolatilityRank::Low,
            StabilityBand::Mixed => VolatilityRank::Mid,
            StabilityBand::Unstable => VolatilityRank::High,
        };
    }

    let Some((h, y)) = raw_levels else {
        return VolatilityRank::Mid;
    };
    let h = f64::from(h);
    let y = f64::from(y);
    let gap = (h - y).abs();
    let mean = (h + y) / 2.0;

    if gap >= config.gap_high || mean >= config.mean_high {
        VolatilityRank::High
    } else if gap >= config.gap_mid || mean >= config.mean_mid {
        VolatilityRank::Mid
    } else {
        VolatilityRank::Low
    }
}

/// Hysteresis clamp. A Low verdict after any non-Low previous rank becomes
/// Mid; everything else passes through.
fn smooth(base: VolatilityRank, previous: Option<VolatilityRank>) -> VolatilityRank {
    match (previous, base) {
        (Some(VolatilityRank::High | VolatilityRank::Mid), VolatilityRank::Low) => {
            VolatilityRank::Mid
        }
        _ => base,
    }
}
