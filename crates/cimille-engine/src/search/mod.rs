//! Iterative-deepening search controller.

pub mod alphabeta;
pub mod job;
pub mod ordering;

use std::time::{Duration, Instant};

use cimille_core::{Move, Position, move_to_uci};
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::eval::evaluate;
use crate::score::{Score, is_mate};
use alphabeta::search_root;
use job::SearchJob;

/// Assumed growth of iteration time per extra ply.
pub const BRANCHING_ESTIMATE: u32 = 4;

/// Below this much remaining budget no new iteration is started.
pub const MIN_ITERATION_TIME: Duration = Duration::from_millis(10);

/// Root candidates written to the debug log per iteration.
const LOGGED_CANDIDATES: usize = 4;

/// A root move with its White-positive score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: Score,
}

/// Lifecycle of a [`Searcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    /// Depth bound reached, mate found, or nothing left to search.
    Completed,
    /// Stopped by the external flag.
    Cancelled,
    /// Stopped by the time budget.
    TimedOut,
}

/// Emitted after each fully completed iteration.
#[derive(Debug, Clone)]
pub struct ProgressRecord {
    pub depth: u8,
    /// White-positive score of the best root move.
    pub score: Score,
    pub nodes: u64,
    /// Nodes per second since the job started.
    pub nps: u64,
    pub elapsed: Duration,
    pub best_move: Move,
}

/// Outcome of [`Searcher::run`].
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `None` only when the position has no legal moves.
    pub best_move: Option<Move>,
    /// Score of the deepest completed iteration, or the static score if none completed.
    pub score: Score,
    /// Deepest completed iteration; 0 if none completed.
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub state: SearchState,
}

/// Runs one [`SearchJob`] to completion.
pub struct Searcher {
    job: SearchJob,
    state: SearchState,
}

impl Searcher {
    pub fn new(job: SearchJob) -> Self {
        Self {
            job,
            state: SearchState::Idle,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn job(&self) -> &SearchJob {
        &self.job
    }

    /// Search `pos` with iterative deepening.
    ///
    /// Calls `on_progress` after each completed iteration. Interrupted
    /// iterations are discarded; the answer always comes from the deepest
    /// completed one. If none completed, a random legal move is returned.
    /// `pos` is restored to its entry state before returning.
    pub fn run<F>(&mut self, pos: &mut Position, mut on_progress: F) -> Result<SearchResult, SearchError>
    where
        F: FnMut(&ProgressRecord),
    {
        if self.state != SearchState::Idle {
            return Err(SearchError::JobReused { state: self.state });
        }
        self.state = SearchState::Running;

        let max_depth = self.job.limits().max_depth();
        info!(
            max_depth,
            budget_ms = saturating_millis(self.job.limits().time_budget),
            fen = %pos.to_fen(),
            "search started"
        );

        let mut best: Option<ScoredMove> = None;
        let mut completed_depth: u8 = 0;
        let mut last_iteration = Duration::ZERO;
        let mut outcome = SearchState::Completed;

        for depth in 1..=max_depth {
            if self.job.is_cancelled() {
                outcome = SearchState::Cancelled;
                break;
            }
            if self.job.is_out_of_time() {
                outcome = SearchState::TimedOut;
                break;
            }
            if depth > 1 {
                let remaining = self.job.remaining();
                let predicted = last_iteration.saturating_mul(BRANCHING_ESTIMATE);
                if remaining < MIN_ITERATION_TIME || predicted > remaining {
                    debug!(
                        depth,
                        predicted_ms = saturating_millis(predicted),
                        remaining_ms = saturating_millis(remaining),
                        "not enough time for another iteration"
                    );
                    outcome = SearchState::TimedOut;
                    break;
                }
            }

            let iteration_start = Instant::now();
            let root = match search_root(pos, depth, &mut self.job) {
                Ok(root) => root,
                Err(err) => {
                    self.state = SearchState::Cancelled;
                    return Err(err);
                }
            };

            if root.interrupted {
                debug!(depth, "iteration interrupted, discarding partial result");
                outcome = if self.job.is_cancelled() {
                    SearchState::Cancelled
                } else {
                    SearchState::TimedOut
                };
                break;
            }

            let Some(top) = root.moves.first().cloned() else {
                debug!("no legal moves at root");
                break;
            };

            last_iteration = iteration_start.elapsed();
            completed_depth = depth;

            for (rank, candidate) in root.moves.iter().take(LOGGED_CANDIDATES).enumerate() {
                debug!(
                    depth,
                    rank = rank + 1,
                    mv = %move_to_uci(&candidate.mv),
                    score = candidate.score,
                    "root candidate"
                );
            }

            let elapsed = self.job.elapsed();
            on_progress(&ProgressRecord {
                depth,
                score: top.score,
                nodes: self.job.nodes(),
                nps: nodes_per_second(self.job.nodes(), elapsed),
                elapsed,
                best_move: top.mv.clone(),
            });

            let mate_found = is_mate(top.score);
            best = Some(top);
            if mate_found {
                debug!(depth, "mate found, stopping");
                break;
            }
        }

        self.state = outcome;

        let (best_move, score) = match best {
            Some(scored) => (Some(scored.mv), scored.score),
            None => (random_move(pos), evaluate(pos)),
        };

        let result = SearchResult {
            best_move,
            score,
            depth: completed_depth,
            nodes: self.job.nodes(),
            elapsed: self.job.elapsed(),
            state: outcome,
        };
        info!(
            depth = result.depth,
            score = result.score,
            nodes = result.nodes,
            elapsed_ms = saturating_millis(result.elapsed),
            state = ?result.state,
            "search finished"
        );
        Ok(result)
    }
}

/// Uniformly random legal move, used when no iteration completed.
fn random_move(pos: &Position) -> Option<Move> {
    let moves = pos.legal_moves();
    let mv = moves.choose(&mut rand::thread_rng()).cloned();
    if let Some(mv) = &mv {
        warn!(mv = %move_to_uci(mv), "no iteration completed, playing a random move");
    }
    mv
}

/// Whole milliseconds, `u64::MAX` for unbounded budgets.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let millis = saturating_millis(elapsed).max(1);
    nodes.saturating_mul(1_000) / millis
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use cimille_core::Position;

    use super::*;
    use crate::score::MATE_SCORE;
    use crate::search::job::SearchLimits;

    const SCHOLARS_MATE_FEN: &str =
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

    fn searcher(limits: SearchLimits) -> Searcher {
        Searcher::new(SearchJob::new(limits, Arc::new(AtomicBool::new(false))))
    }

    #[test]
    fn depth_one_from_start_picks_a_legal_move() {
        let mut pos = Position::new();
        let legal = pos.legal_moves();
        let result = searcher(SearchLimits::depth(1)).run(&mut pos, |_| {}).unwrap();
        let best = result.best_move.expect("start position has moves");
        assert!(legal.contains(&best));
        assert!(!is_mate(result.score));
        assert_eq!(result.depth, 1);
        assert_eq!(result.state, SearchState::Completed);
    }

    #[test]
    fn finds_mate_in_one() {
        let mut pos = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let result = searcher(SearchLimits::depth(5)).run(&mut pos, |_| {}).unwrap();
        assert_eq!(move_to_uci(&result.best_move.unwrap()), "h5f7");
        assert_eq!(result.score, MATE_SCORE - 1);
        // Mate at depth 1 ends the search.
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn stalemate_has_no_move() {
        let mut pos = Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        let result = searcher(SearchLimits::depth(3)).run(&mut pos, |_| {}).unwrap();
        assert!(result.best_move.is_none());
        assert_eq!(result.depth, 0);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn checkmated_root_has_no_move() {
        let mut pos = Position::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        let result = searcher(SearchLimits::depth(3)).run(&mut pos, |_| {}).unwrap();
        assert!(result.best_move.is_none());
        assert_eq!(result.score, -MATE_SCORE);
    }

    #[test]
    fn reports_each_depth_in_order() {
        let mut pos = Position::new();
        let mut depths = Vec::new();
        searcher(SearchLimits::depth(3))
            .run(&mut pos, |progress| depths.push(progress.depth))
            .unwrap();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn stop_during_search_keeps_completed_answer() {
        let stop = Arc::new(AtomicBool::new(false));
        let job = SearchJob::new(SearchLimits::depth(10), Arc::clone(&stop));
        let mut searcher = Searcher::new(job);
        let mut pos = Position::new();
        let result = searcher
            .run(&mut pos, |progress| {
                if progress.depth == 2 {
                    stop.store(true, Ordering::Release);
                }
            })
            .unwrap();
        assert_eq!(result.state, SearchState::Cancelled);
        assert_eq!(result.depth, 2);
        assert!(result.best_move.is_some());
        assert_eq!(searcher.state(), SearchState::Cancelled);
    }

    #[test]
    fn cancelled_before_start_falls_back_to_random_move() {
        let mut pos = Position::new();
        let legal = pos.legal_moves();
        let mut searcher = searcher(SearchLimits::depth(4));
        searcher.job().cancel();
        let result = searcher.run(&mut pos, |_| {}).unwrap();
        assert_eq!(result.state, SearchState::Cancelled);
        assert_eq!(result.depth, 0);
        assert!(legal.contains(&result.best_move.unwrap()));
    }

    #[test]
    fn position_is_unchanged_after_run() {
        let mut pos = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let before = pos.to_fen();
        searcher(SearchLimits::depth(3)).run(&mut pos, |_| {}).unwrap();
        assert_eq!(pos.to_fen(), before);
    }

    #[test]
    fn job_cannot_run_twice() {
        let mut pos = Position::new();
        let mut searcher = searcher(SearchLimits::depth(1));
        searcher.run(&mut pos, |_| {}).unwrap();
        let err = searcher.run(&mut pos, |_| {}).unwrap_err();
        assert!(matches!(
            err,
            SearchError::JobReused {
                state: SearchState::Completed
            }
        ));
    }

    #[test]
    fn unbounded_budget_logs_as_max_millis() {
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
        assert_eq!(saturating_millis(Duration::from_millis(1_500)), 1_500);
    }

    #[test]
    fn nps_handles_zero_elapsed() {
        assert_eq!(nodes_per_second(500, Duration::ZERO), 500_000);
        assert_eq!(nodes_per_second(2_000, Duration::from_secs(2)), 1_000);
    }
}
