//! Material balance.
//!
//! Piece weights are in pawns: pawn 1, knight 3, bishop 3, rook 5, queen 9,
//! king 0. The evaluation works in centipawns, so the weights are scaled by
//! [`PAWN_VALUE`]. Move ordering uses the raw weights.

use cimille_core::{Color, Position, Role};

use crate::score::Score;

/// Centipawn value of one pawn.
pub const PAWN_VALUE: Score = 100;

/// Material weight of a piece kind, in pawns.
pub const fn piece_weight(role: Role) -> i32 {
    match role {
        Role::Pawn => 1,
        Role::Knight | Role::Bishop => 3,
        Role::Rook => 5,
        Role::Queen => 9,
        Role::King => 0,
    }
}

/// Material balance in centipawns, White-positive.
pub fn material(pos: &Position) -> Score {
    pos.pieces()
        .map(|(_, piece)| {
            let value = piece_weight(piece.role) * PAWN_VALUE;
            match piece.color {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum()
}
