//! The mutable game position used by the search.
//!
//! Moves are applied in place and taken back with [`Position::undo`]. Every
//! apply saves the complete prior state, so an undo restores side to move,
//! castling rights, en passant square and both move counters exactly.

use shakmaty::fen::Fen;
use shakmaty::{
    Bitboard, Board, CastlingMode, CastlingSide, Chess, Color, EnPassantMode, Move, MoveList,
    Piece, Position as _, Rank, Role, Square, attacks,
};
use tracing::debug;

use crate::error::PositionError;
use crate::notation::move_to_uci;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule applies.
const FIFTY_MOVE_PLIES: u32 = 100;

/// A chess position with an undo stack.
#[derive(Debug, Clone)]
pub struct Position {
    current: Chess,
    /// Prior states, oldest first. Includes moves replayed from the game.
    history: Vec<Chess>,
}

impl Position {
    /// The standard starting position with empty history.
    pub fn new() -> Self {
        Self {
            current: Chess::default(),
            history: Vec::new(),
        }
    }

    /// Import a position from FEN. The history starts empty.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fen = fen.trim();
        let parsed: Fen = fen.parse().map_err(|_| PositionError::InvalidFen {
            fen: fen.to_string(),
        })?;
        let current: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|err| PositionError::IllegalPosition {
                fen: fen.to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            current,
            history: Vec::new(),
        })
    }

    /// Export the current position as FEN.
    pub fn to_fen(&self) -> String {
        Fen::from_position(self.current.clone(), EnPassantMode::Legal).to_string()
    }

    /// Return to the starting position and forget all history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn side_to_move(&self) -> Color {
        self.current.turn()
    }

    /// All legal moves, in generation order.
    pub fn legal_moves(&self) -> MoveList {
        self.current.legal_moves()
    }

    /// Number of legal moves for the side to move.
    pub fn mobility(&self) -> usize {
        self.current.legal_moves().len()
    }

    /// Number of legal moves the other side would have if it were to move
    /// from this exact placement, with en passant cleared.
    ///
    /// When the side to move is in check the turn cannot be handed over
    /// through the rules layer, so the moves are generated from the board
    /// directly. The checked king is never a capture target.
    pub fn opponent_mobility(&self) -> usize {
        match self.current.clone().swap_turn() {
            Ok(swapped) => swapped.legal_moves().len(),
            Err(_) => moves_with_turn_swapped(&self.current, !self.current.turn()),
        }
    }

    /// Apply a legal move in place.
    ///
    /// The caller guarantees `mv` came from [`legal_moves`](Self::legal_moves)
    /// for this exact position.
    pub fn apply(&mut self, mv: &Move) {
        let previous = self.current.clone();
        self.current.play_unchecked(mv);
        self.history.push(previous);
    }

    /// Take back the most recently applied move.
    pub fn undo(&mut self) -> Result<(), PositionError> {
        self.current = self.history.pop().ok_or(PositionError::NothingToUndo)?;
        Ok(())
    }

    /// Number of moves currently on the undo stack.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_check(&self) -> bool {
        self.current.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.current.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.current.is_stalemate()
    }

    /// Draw by insufficient material, the fifty-move rule, or threefold repetition.
    pub fn is_draw(&self) -> bool {
        self.current.is_insufficient_material()
            || self.current.halfmoves() >= FIFTY_MOVE_PLIES
            || self.is_threefold_repetition()
    }

    /// Whether playing `mv` would leave the opponent in check.
    ///
    /// Plays the move on a scratch copy; `self` is not touched.
    pub fn gives_check(&self, mv: &Move) -> bool {
        let mut scratch = self.current.clone();
        scratch.play_unchecked(mv);
        scratch.is_check()
    }

    /// Every occupied square with its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        let board = self.current.board();
        board
            .occupied()
            .into_iter()
            .filter_map(move |sq| board.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Find the legal move matching a UCI string such as `e2e4` or `e7e8q`.
    pub fn parse_uci_move(&self, uci_move: &str) -> Result<Move, PositionError> {
        self.current
            .legal_moves()
            .into_iter()
            .find(|mv| move_to_uci(mv) == uci_move)
            .ok_or_else(|| PositionError::InvalidMove {
                uci_move: uci_move.to_string(),
            })
    }

    /// Replay a list of UCI moves, stopping at the first illegal one.
    ///
    /// Replayed moves stay on the history so repetitions across the game are
    /// recognised during search.
    pub fn apply_uci_moves<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<(), PositionError> {
        for uci_move in moves {
            let mv = self.parse_uci_move(uci_move.as_ref())?;
            self.apply(&mv);
        }
        debug!(moves = moves.len(), fen = %self.to_fen(), "replayed move list");
        Ok(())
    }

    /// Same placement and side to move seen at least twice before, within
    /// the reversible part of the history.
    fn is_threefold_repetition(&self) -> bool {
        let reversible = self.current.halfmoves() as usize;
        let mut seen = 0;
        for previous in self.history.iter().rev().take(reversible).skip(1).step_by(2) {
            if previous.turn() == self.current.turn() && previous.board() == self.current.board() {
                seen += 1;
                if seen >= 2 {
                    return true;
                }
            }
        }
        false
    }
}

/// Legal-move count for `side` on the placement of `pos`, as if it were
/// `side`'s turn with en passant cleared. A promotion counts once per piece it can become.
fn moves_with_turn_swapped(pos: &Chess, side: Color) -> usize {
    let board = pos.board();
    let Some(king) = board.king_of(side) else {
        return 0;
    };
    let their_king = board.king_of(!side).map_or(Bitboard::EMPTY, Bitboard::from);
    let targets = !board.by_color(side) & !their_king;
    let last_rank = match side {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    };

    let mut count = 0;
    for from in board.by_color(side) {
        let Some(role) = board.role_at(from) else {
            continue;
        };
        let destinations = if role == Role::Pawn {
            pawn_destinations(board, side, from) & targets
        } else {
            board.attacks_from(from) & targets
        };
        for to in destinations {
            if !keeps_king_safe(board, side, king, from, to) {
                continue;
            }
            count += if role == Role::Pawn && to.rank() == last_rank { 4 } else { 1 };
        }
    }

    count + castling_moves(pos, side, king)
}

/// Pushes and captures for a pawn, without en passant.
fn pawn_destinations(board: &Board, side: Color, from: Square) -> Bitboard {
    let occupied = board.occupied();
    let (step, start) = match side {
        Color::White => (8, Rank::Second),
        Color::Black => (-8, Rank::Seventh),
    };

    let mut destinations = attacks::pawn_attacks(side, from) & board.by_color(!side);
    if let Some(one) = from.offset(step)
        && !occupied.contains(one)
    {
        destinations |= Bitboard::from(one);
        if from.rank() == start
            && let Some(two) = one.offset(step)
            && !occupied.contains(two)
        {
            destinations |= Bitboard::from(two);
        }
    }
    destinations
}

/// Whether moving `from` to `to` leaves `side`'s king unattacked.
fn keeps_king_safe(board: &Board, side: Color, king: Square, from: Square, to: Square) -> bool {
    let occupied = (board.occupied() ^ Bitboard::from(from)) | Bitboard::from(to);
    let king_square = if from == king { to } else { king };
    let attackers = board.attacks_to(king_square, !side, occupied) & !Bitboard::from(to);
    attackers.is_empty()
}

/// Castling moves available to `side`: rights held, path empty, king path unattacked.
fn castling_moves(pos: &Chess, side: Color, king: Square) -> usize {
    let board = pos.board();
    let castles = pos.castles();
    [CastlingSide::KingSide, CastlingSide::QueenSide]
        .into_iter()
        .filter(|&castling_side| {
            let king_to = castling_side.king_to(side);
            let king_path =
                attacks::between(king, king_to) | Bitboard::from(king_to) | Bitboard::from(king);
            castles.rook(side, castling_side).is_some()
                && (castles.path(side, castling_side) & board.occupied()).is_empty()
                && king_path
                    .into_iter()
                    .all(|sq| board.attacks_to(sq, !side, board.occupied()).is_empty())
        })
        .count()
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
