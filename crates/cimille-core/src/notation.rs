//! UCI coordinate notation for moves.

use shakmaty::{File, Move, Square};

/// Render a move in UCI coordinate form (`e2e4`, `e7e8q`, `e1g1`).
///
/// Castling is written as the king's origin and destination squares, which is
/// what GUIs expect for standard chess.
pub fn move_to_uci(mv: &Move) -> String {
    match *mv {
        Move::Normal {
            from,
            to,
            promotion: Some(role),
            ..
        } => format!("{from}{to}{}", role.char()),
        Move::Normal { from, to, .. } | Move::EnPassant { from, to } => format!("{from}{to}"),
        Move::Castle { king, rook } => {
            let file = if (rook as u8) > (king as u8) { File::G } else { File::C };
            format!("{king}{}", Square::from_coords(file, king.rank()))
        }
        Move::Put { role, to } => format!("{}@{to}", role.upper_char()),
    }
}
