//! Search job: limits, start time, stop flag and node counter for one search.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Depth used as the loop bound when no depth limit is given.
pub const MAX_DEPTH: u8 = 64;

/// How deep and how long one search may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Depth bound; `None` means unbounded (capped at [`MAX_DEPTH`]).
    pub depth: Option<u8>,
    /// Wall-clock budget measured from job creation. Always positive.
    pub time_budget: Duration,
}

impl SearchLimits {
    /// Fixed depth with no deadline.
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            time_budget: Duration::MAX,
        }
    }

    /// Deepest iteration the controller may start.
    pub fn max_depth(&self) -> u8 {
        self.depth.unwrap_or(MAX_DEPTH).min(MAX_DEPTH)
    }
}

/// State owned by a single search invocation.
///
/// The stop flag is shared with whoever may cancel the search. It is cleared
/// when the job is created and never cleared again for the life of the job.
#[derive(Debug)]
pub struct SearchJob {
    limits: SearchLimits,
    start: Instant,
    stop: Arc<AtomicBool>,
    nodes: u64,
}

impl SearchJob {
    /// Start a new job: clear the stop flag, zero the node count, start the clock.
    pub fn new(limits: SearchLimits, stop: Arc<AtomicBool>) -> Self {
        stop.store(false, Ordering::Release);
        Self {
            limits,
            start: Instant::now(),
            stop,
            nodes: 0,
        }
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Whether an external stop was requested.
    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn is_out_of_time(&self) -> bool {
        self.elapsed() >= self.limits.time_budget
    }

    /// Checked at every recursion entry and before every root move.
    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.is_out_of_time()
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Budget left before the deadline.
    pub fn remaining(&self) -> Duration {
        self.limits.time_budget.saturating_sub(self.elapsed())
    }

    /// Leaf positions evaluated so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(crate) fn count_node(&mut self) {
        self.nodes += 1;
    }

    /// Request cancellation. The flag stays set until a new job is created.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// The shared stop flag.
    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stop
    }
}
