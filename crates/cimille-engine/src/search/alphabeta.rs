//! Minimax alpha-beta search over a fixed depth.
//!
//! Scores are White-positive throughout: White maximizes, Black minimizes.
//! The position is mutated in place and restored before every return.

use cimille_core::{Color, Move, Position};

use crate::error::SearchError;
use crate::eval::evaluate;
use crate::score::{DRAW, INF, Score, mated, toward_root};
use crate::search::ScoredMove;
use crate::search::job::SearchJob;
use crate::search::ordering::order_moves;

/// Result of searching one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResult {
    pub score: Score,
    /// Best move at this node; `None` at leaves and terminal positions.
    pub best_move: Option<Move>,
}

impl NodeResult {
    fn leaf(score: Score) -> Self {
        Self {
            score,
            best_move: None,
        }
    }
}

/// Root moves searched in one iteration.
#[derive(Debug, Clone)]
pub struct RootSearch {
    /// Searched root moves, best first for the side to move. Ties keep search
    /// order. Only the first entry is exact; later ones may be bounds.
    pub moves: Vec<ScoredMove>,
    /// The stop flag or deadline fired during the iteration.
    pub interrupted: bool,
}

/// Alpha-beta search of `pos` to `depth` plies within `[alpha, beta]`.
///
/// First match wins:
/// 1. stop requested or out of time: static evaluation;
/// 2. checkmate: the mate score against the side to move;
/// 3. stalemate or draw: [`DRAW`];
/// 4. depth 0: static evaluation (counted as a node);
/// 5. otherwise recurse over the ordered moves, cutting off once `alpha >= beta`.
pub fn alpha_beta(
    pos: &mut Position,
    depth: u8,
    mut alpha: Score,
    mut beta: Score,
    job: &mut SearchJob,
) -> Result<NodeResult, SearchError> {
    debug_assert!(alpha <= beta, "window inverted: alpha {alpha} > beta {beta}");

    if job.should_stop() {
        return Ok(NodeResult::leaf(evaluate(pos)));
    }

    let moves = pos.legal_moves();
    if moves.is_empty() {
        let score = if pos.is_check() {
            mated(pos.side_to_move())
        } else {
            DRAW
        };
        return Ok(NodeResult::leaf(score));
    }
    if pos.is_draw() {
        return Ok(NodeResult::leaf(DRAW));
    }

    if depth == 0 {
        job.count_node();
        return Ok(NodeResult::leaf(evaluate(pos)));
    }

    let maximizing = pos.side_to_move() == Color::White;
    let mut best = NodeResult::leaf(if maximizing { -INF } else { INF });

    for mv in order_moves(pos, moves) {
        pos.apply(&mv);
        let child = alpha_beta(pos, depth - 1, alpha, beta, job);
        pos.undo()?;
        let score = toward_root(child?.score);

        if maximizing {
            if score > best.score {
                best = NodeResult {
                    score,
                    best_move: Some(mv),
                };
            }
            alpha = alpha.max(score);
        } else {
            if score < best.score {
                best = NodeResult {
                    score,
                    best_move: Some(mv),
                };
            }
            beta = beta.min(score);
        }

        if alpha >= beta {
            break;
        }
    }

    Ok(best)
}

/// Search every root move to `depth` and collect their scores.
///
/// Stop and deadline are checked before each root move. A root with no legal
/// moves yields an empty list.
pub fn search_root(
    pos: &mut Position,
    depth: u8,
    job: &mut SearchJob,
) -> Result<RootSearch, SearchError> {
    debug_assert!(depth >= 1, "root search needs at least one ply");

    let maximizing = pos.side_to_move() == Color::White;
    let mut alpha = -INF;
    let mut beta = INF;
    let mut scored: Vec<ScoredMove> = Vec::new();
    let mut interrupted = false;

    for mv in order_moves(pos, pos.legal_moves()) {
        if job.should_stop() {
            interrupted = true;
            break;
        }

        pos.apply(&mv);
        let child = alpha_beta(pos, depth - 1, alpha, beta, job);
        pos.undo()?;
        let score = toward_root(child?.score);

        scored.push(ScoredMove { mv, score });
        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if alpha >= beta {
            break;
        }
    }

    // A deadline hit inside the last subtree truncated it.
    interrupted |= job.should_stop();

    if maximizing {
        scored.sort_by(|a, b| b.score.cmp(&a.score));
    } else {
        scored.sort_by(|a, b| a.score.cmp(&b.score));
    }

    Ok(RootSearch {
        moves: scored,
        interrupted,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use cimille_core::{Position, move_to_uci};

    use super::*;
    use crate::score::{MATE_SCORE, is_mate};
    use crate::search::job::SearchLimits;

    const SCHOLARS_MATE_FEN: &str =
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

    fn job(depth: u8) -> SearchJob {
        SearchJob::new(SearchLimits::depth(depth), Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn finds_mate_in_one_for_white() {
        let mut pos = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let mut job = job(1);
        let node = alpha_beta(&mut pos, 1, -INF, INF, &mut job).unwrap();
        assert_eq!(move_to_uci(&node.best_move.unwrap()), "h5f7");
        assert_eq!(node.score, MATE_SCORE - 1);
    }

    #[test]
    fn finds_mate_in_one_for_black() {
        // Fool's mate, one move early: Black plays Qh4#.
        let mut pos = Position::from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
        )
        .unwrap();
        let mut job = job(1);
        let node = alpha_beta(&mut pos, 1, -INF, INF, &mut job).unwrap();
        assert_eq!(move_to_uci(&node.best_move.unwrap()), "d8h4");
        assert_eq!(node.score, -(MATE_SCORE - 1));
    }

    #[test]
    fn checkmated_node_scores_against_side_to_move() {
        let mut pos = Position::from_fen("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1").unwrap();
        let node = alpha_beta(&mut pos, 3, -INF, INF, &mut job(3)).unwrap();
        assert_eq!(node.score, MATE_SCORE);
        assert!(node.best_move.is_none());
    }

    #[test]
    fn stalemate_node_is_draw() {
        let mut pos = Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        let node = alpha_beta(&mut pos, 3, -INF, INF, &mut job(3)).unwrap();
        assert_eq!(node.score, DRAW);
    }

    #[test]
    fn insufficient_material_is_draw() {
        let mut pos = Position::from_fen("8/8/8/4k3/8/8/3N4/4K3 w - - 0 1").unwrap();
        let node = alpha_beta(&mut pos, 2, -INF, INF, &mut job(2)).unwrap();
        assert_eq!(node.score, DRAW);
    }

    #[test]
    fn position_is_restored_after_search() {
        let mut pos = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let before = pos.to_fen();
        alpha_beta(&mut pos, 3, -INF, INF, &mut job(3)).unwrap();
        assert_eq!(pos.to_fen(), before);
        assert_eq!(pos.ply_count(), 0);
    }

    #[test]
    fn depth_zero_counts_a_node() {
        let mut pos = Position::new();
        let mut job = job(0);
        let node = alpha_beta(&mut pos, 0, -INF, INF, &mut job).unwrap();
        assert_eq!(node.score, evaluate(&pos));
        assert_eq!(job.nodes(), 1);
    }

    #[test]
    fn cancelled_search_returns_static_score_without_counting() {
        let mut pos = Position::new();
        let mut job = job(4);
        job.cancel();
        let node = alpha_beta(&mut pos, 4, -INF, INF, &mut job).unwrap();
        assert_eq!(node.score, evaluate(&pos));
        assert_eq!(job.nodes(), 0);
    }

    #[test]
    fn wins_a_hanging_queen() {
        let mut pos = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let node = alpha_beta(&mut pos, 2, -INF, INF, &mut job(2)).unwrap();
        assert_eq!(move_to_uci(&node.best_move.unwrap()), "e4d5");
        assert!(!is_mate(node.score));
    }

    #[test]
    fn root_search_lists_best_first() {
        let mut pos = Position::from_fen(SCHOLARS_MATE_FEN).unwrap();
        let root = search_root(&mut pos, 1, &mut job(1)).unwrap();
        assert!(!root.interrupted);
        assert_eq!(move_to_uci(&root.moves[0].mv), "h5f7");
        assert!(is_mate(root.moves[0].score));
    }

    #[test]
    fn root_search_minimizes_for_black() {
        let mut pos = Position::from_fen("4k3/8/4p3/3Q4/8/8/8/4K3 b - - 0 1").unwrap();
        let root = search_root(&mut pos, 2, &mut job(2)).unwrap();
        assert_eq!(move_to_uci(&root.moves[0].mv), "e6d5");
        assert!(root.moves[0].score < 0);
        assert!(root.moves.windows(2).all(|pair| pair[0].score <= pair[1].score));
    }

    #[test]
    fn root_search_with_no_moves_is_empty() {
        let mut pos = Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        let root = search_root(&mut pos, 2, &mut job(2)).unwrap();
        assert!(root.moves.is_empty());
        assert!(!root.interrupted);
    }

    #[test]
    fn cancelled_root_search_is_interrupted() {
        let mut pos = Position::new();
        let mut job = job(3);
        job.cancel();
        let root = search_root(&mut pos, 3, &mut job).unwrap();
        assert!(root.interrupted);
        assert!(root.moves.is_empty());
    }
}
