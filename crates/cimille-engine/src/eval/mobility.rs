//! Mobility: legal-move count difference between the two sides.

use cimille_core::{Color, Position};

use crate::score::Score;

/// Centipawns per legal move of difference.
pub const MOBILITY_WEIGHT: Score = 10;

/// Mobility score, White-positive.
///
/// `own_moves` is the legal-move count of the side to move, which the caller
/// already has. The other side's count comes from the same placement with the
/// turn handed over and en passant cleared, also when the side to move is in check.
pub fn mobility(pos: &Position, own_moves: usize) -> Score {
    let own = own_moves as Score;
    let other = pos.opponent_mobility() as Score;
    let white_minus_black = match pos.side_to_move() {
        Color::White => own - other,
        Color::Black => other - own,
    };
    white_minus_black * MOBILITY_WEIGHT
}
