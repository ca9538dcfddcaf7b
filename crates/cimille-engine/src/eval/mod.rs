//! Static evaluation.
//!
//! [`evaluate`] is a pure function of the position: it never mutates it and
//! returns the same score for the same position. The score is White-positive
//! like every other score in the engine.

pub mod material;
pub mod mobility;
pub mod pst;

use cimille_core::{Color, Position};

use crate::score::{DRAW, Score, mated};

/// Penalty applied to the side that is in check, in centipawns.
///
/// Kept well below a pawn so a check never outweighs material.
pub const CHECK_PENALTY: Score = 30;

/// Score a position without searching.
///
/// - checkmate: the mate score against the side to move;
/// - stalemate: [`DRAW`], the same value the search assigns;
/// - otherwise: material + piece-square + mobility + check term.
pub fn evaluate(pos: &Position) -> Score {
    let own_moves = pos.mobility();
    if own_moves == 0 {
        return if pos.is_check() {
            mated(pos.side_to_move())
        } else {
            DRAW
        };
    }

    material::material(pos)
        + pst::positional(pos)
        + mobility::mobility(pos, own_moves)
        + check_term(pos)
}

fn check_term(pos: &Position) -> Score {
    if !pos.is_check() {
        return 0;
    }
    match pos.side_to_move() {
        Color::White => -CHECK_PENALTY,
        Color::Black => CHECK_PENALTY,
    }
}
