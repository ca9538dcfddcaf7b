//! Move ordering: captures by MVV-LVA, then checks, then promotions.
//!
//! Ordering only changes how much alpha-beta can prune, never the score it
//! returns. The sort is stable so moves with equal keys keep generation order.

use cimille_core::{Move, MoveList, Position};

use crate::eval::material::piece_weight;

/// Added to every capture so captures sort above all non-captures.
pub const CAPTURE_BONUS: i32 = 1_000;

/// Added to every move that gives check.
pub const CHECK_BONUS: i32 = 500;

/// Added to every promotion.
pub const PROMOTION_BONUS: i32 = 300;

/// Heuristic ordering key for `mv`; higher is searched first.
///
/// Captures score `victim * 10 - attacker + CAPTURE_BONUS` using pawn-unit
/// piece weights. Check and promotion bonuses stack on top.
pub fn score_move(pos: &Position, mv: &Move) -> i32 {
    let mut score = 0;

    if let Some(victim) = mv.capture() {
        score += piece_weight(victim) * 10 - piece_weight(mv.role()) + CAPTURE_BONUS;
    }
    if pos.gives_check(mv) {
        score += CHECK_BONUS;
    }
    if mv.is_promotion() {
        score += PROMOTION_BONUS;
    }

    score
}

/// Return `moves` sorted best-first by [`score_move`], ties in input order.
pub fn order_moves(pos: &Position, moves: MoveList) -> Vec<Move> {
    let mut keyed: Vec<(i32, Move)> = moves
        .into_iter()
        .map(|mv| (score_move(pos, &mv), mv))
        .collect();

    // `sort_by` is stable.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, mv)| mv).collect()
}
