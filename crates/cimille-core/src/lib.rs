//! Position adapter: apply/undo game state, FEN and UCI notation over `shakmaty`.

mod error;
mod notation;
mod position;

pub use error::PositionError;
pub use notation::move_to_uci;
pub use position::{Position, STARTING_FEN};

pub use shakmaty::{Color, Move, MoveList, Piece, Role, Square};
