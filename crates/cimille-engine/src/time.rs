//! Time management: convert clock parameters to search limits.

use std::time::Duration;

use cimille_core::Color;

use crate::search::job::SearchLimits;

/// Tunable constants for [`compute_limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConfig {
    /// Safety buffer subtracted from clock-derived budgets.
    pub move_overhead: Duration,
    /// Budget used when no timing information is given.
    pub fallback_budget: Duration,
    /// Depth bound used when neither time nor depth is given.
    pub fallback_depth: u8,
    /// Expected moves remaining when `movestogo` is unknown.
    pub divisor: u32,
    /// Hard cap on a single move, as a percentage of the remaining clock.
    pub cap_percent: u32,
    /// Floor for every budget.
    pub min_budget: Duration,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            move_overhead: Duration::from_millis(30),
            fallback_budget: Duration::from_millis(1_000),
            fallback_depth: 4,
            divisor: 20,
            cap_percent: 30,
            min_budget: Duration::from_millis(5),
        }
    }
}

/// Clock parameters of a `go` request, already resolved for the side to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeInputs {
    pub remaining: Option<Duration>,
    pub increment: Option<Duration>,
    pub moves_to_go: Option<u32>,
    pub move_time: Option<Duration>,
    pub depth: Option<u8>,
    pub infinite: bool,
}

impl TimeInputs {
    /// Pick the clock and increment belonging to `side`.
    pub fn for_side(
        side: Color,
        wtime: Option<Duration>,
        btime: Option<Duration>,
        winc: Option<Duration>,
        binc: Option<Duration>,
    ) -> Self {
        let (remaining, increment) = match side {
            Color::White => (wtime, winc),
            Color::Black => (btime, binc),
        };
        Self {
            remaining,
            increment,
            ..Self::default()
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Derive the depth bound and time budget for one search.
///
/// Priority order:
/// 1. `infinite` -> no deadline, depth as given
/// 2. `move_time` -> that budget, depth as given
/// 3. positive remaining clock -> share of the clock plus increment, minus overhead
/// 4. nothing -> fallback budget, and fallback depth unless a depth was given
///
/// Every budget is at least `config.min_budget`.
pub fn compute_limits(inputs: &TimeInputs, config: &TimeConfig) -> SearchLimits {
    if inputs.infinite {
        return SearchLimits {
            depth: inputs.depth,
            time_budget: Duration::MAX,
        };
    }

    if let Some(move_time) = inputs.move_time {
        return SearchLimits {
            depth: inputs.depth,
            time_budget: move_time.max(config.min_budget),
        };
    }

    if let Some(remaining) = inputs.remaining
        && !remaining.is_zero()
    {
        let remaining_ms = millis(remaining);
        let inc_ms = inputs.increment.map_or(0, millis);
        let overhead_ms = millis(config.move_overhead);

        let share_ms = match inputs.moves_to_go {
            Some(mtg) if mtg > 0 => (remaining_ms / u64::from(mtg)).saturating_add(inc_ms),
            _ => {
                let base =
                    (remaining_ms / u64::from(config.divisor.max(1))).saturating_add(inc_ms);
                let cap = remaining_ms.saturating_mul(u64::from(config.cap_percent)) / 100;
                base.min(cap)
            }
        };

        let budget = Duration::from_millis(share_ms.saturating_sub(overhead_ms));
        return SearchLimits {
            depth: inputs.depth,
            time_budget: budget.max(config.min_budget),
        };
    }

    SearchLimits {
        depth: Some(inputs.depth.unwrap_or(config.fallback_depth)),
        time_budget: config.fallback_budget.max(config.min_budget),
    }
}
