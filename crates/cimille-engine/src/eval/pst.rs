//! Piece-square tables.
//!
//! Tables are laid out as the board looks from White's side: row 0 is rank 8,
//! row 7 is rank 1, column 0 is the a-file. Black reads the same table
//! mirrored vertically. Entries are summed and then divided by
//! [`PST_DIVISOR`] to bring them into centipawns.

use cimille_core::{Color, Piece, Position, Role, Square};

use crate::score::Score;

/// Divisor applied to the summed table entries.
pub const PST_DIVISOR: Score = 10;

type Table = [[Score; 8]; 8];

#[rustfmt::skip]
const PAWN: Table = [
    [   0,    0,    0,    0,    0,    0,    0,    0],
    [ 500,  500,  500, -500, -500,  500,  500,  500],
    [ 100,  100,  200,  300,  300,  200,  100,  100],
    [  50,   50,  100,  250,  250,  100,   50,   50],
    [   0,    0,    0,  200,  200,    0,    0,    0],
    [  50,  -50, -100,    0,    0, -100,  -50,   50],
    [  50,  100,  100, -200, -200,  100,  100,   50],
    [   0,    0,    0,    0,    0,    0,    0,    0],
];

#[rustfmt::skip]
const KNIGHT: Table = [
    [-500, -400, -300, -300, -300, -300, -400, -500],
    [-400, -200,    0,    0,    0,    0, -200, -400],
    [-300,    0,  100,  150,  150,  100,    0, -300],
    [-300,   50,  150,  200,  200,  150,   50, -300],
    [-300,    0,  150,  200,  200,  150,    0, -300],
    [-300,   50,  100,  150,  150,  100,   50, -300],
    [-400, -200,    0,   50,   50,    0, -200, -400],
    [-500, -400, -300, -300, -300, -300, -400, -500],
];

#[rustfmt::skip]
const BISHOP: Table = [
    [-200, -100, -100, -100, -100, -100, -100, -200],
    [-100,    0,    0,    0,    0,    0,    0, -100],
    [-100,    0,   50,  100,  100,   50,    0, -100],
    [-100,   50,   50,  100,  100,   50,   50, -100],
    [-100,    0,  100,  100,  100,  100,    0, -100],
    [-100,  100,  100,  100,  100,  100,  100, -100],
    [-100,   50,    0,    0,    0,    0,   50, -100],
    [-200, -100, -100, -100, -100, -100, -100, -200],
];

#[rustfmt::skip]
const ROOK: Table = [
    [   0,    0,    0,   50,   50,    0,    0,    0],
    [ -50,    0,    0,    0,    0,    0,    0,  -50],
    [ -50,    0,    0,    0,    0,    0,    0,  -50],
    [ -50,    0,    0,    0,    0,    0,    0,  -50],
    [ -50,    0,    0,    0,    0,    0,    0,  -50],
    [ -50,    0,    0,    0,    0,    0,    0,  -50],
    [  50,  100,  100,  100,  100,  100,  100,   50],
    [   0,    0,    0,    0,    0,    0,    0,    0],
];

#[rustfmt::skip]
const QUEEN: Table = [
    [-200, -100, -100,  -50,  -50, -100, -100, -200],
    [-100,    0,    0,    0,    0,    0,    0, -100],
    [-100,    0,   50,   50,   50,   50,    0, -100],
    [ -50,    0,   50,   50,   50,   50,    0,  -50],
    [   0,    0,   50,   50,   50,   50,    0,  -50],
    [-100,   50,   50,   50,   50,   50,    0, -100],
    [-100,    0,   50,    0,    0,    0,    0, -100],
    [-200, -100, -100,  -50,  -50, -100, -100, -200],
];

#[rustfmt::skip]
const KING: Table = [
    [-300, -400, -400, -500, -500, -400, -400, -300],
    [-300, -400, -400, -500, -500, -400, -400, -300],
    [-300, -400, -400, -500, -500, -400, -400, -300],
    [-300, -400, -400, -500, -500, -400, -400, -300],
    [-200, -300, -300, -400, -400, -300, -300, -200],
    [-100, -200, -200, -200, -200, -200, -200, -100],
    [ 200,  200,    0,    0,    0,    0,  200,  200],
    [ 200,  300,  100,    0,    0,  100,  300,  200],
];

const fn table(role: Role) -> &'static Table {
    match role {
        Role::Pawn => &PAWN,
        Role::Knight => &KNIGHT,
        Role::Bishop => &BISHOP,
        Role::Rook => &ROOK,
        Role::Queen => &QUEEN,
        Role::King => &KING,
    }
}

/// Raw (undivided) table entry for `piece` standing on `sq`, from its owner's view.
pub fn pst_value(piece: Piece, sq: Square) -> Score {
    let index = sq as usize;
    let file = index % 8;
    let rank = index / 8;
    let row = match piece.color {
        Color::White => 7 - rank,
        Color::Black => rank,
    };
    table(piece.role)[row][file]
}

/// Positional score in centipawns, White-positive.
pub fn positional(pos: &Position) -> Score {
    let raw: Score = pos
        .pieces()
        .map(|(sq, piece)| match piece.color {
            Color::White => pst_value(piece, sq),
            Color::Black => -pst_value(piece, sq),
        })
        .sum();
    raw / PST_DIVISOR
}

#[cfg(test)]
mod tests {
    use cimille_core::{Color, Piece, Position, Role, Square};

    use super::*;

    #[test]
    fn starting_position_is_symmetric() {
        assert_eq!(positional(&Position::new()), 0);
    }

    #[test]
    fn black_reads_mirrored_table() {
        let white_knight = Piece {
            color: Color::White,
            role: Role::Knight,
        };
        let black_knight = Piece {
            color: Color::Black,
            role: Role::Knight,
        };
        assert_eq!(pst_value(white_knight, Square::B1), pst_value(black_knight, Square::B8));
        assert_eq!(pst_value(white_knight, Square::F3), pst_value(black_knight, Square::F6));
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let knight = Piece {
            color: Color::White,
            role: Role::Knight,
        };
        assert!(pst_value(knight, Square::E4) > pst_value(knight, Square::A4));
    }

    #[test]
    fn castled_king_is_preferred() {
        let king = Piece {
            color: Color::White,
            role: Role::King,
        };
        assert!(pst_value(king, Square::G1) > pst_value(king, Square::E1));
    }

    #[test]
    fn one_sided_development_is_rewarded() {
        // 1.Nf3 with Black not yet replied.
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1").unwrap();
        assert!(positional(&pos) > 0);
    }
}
