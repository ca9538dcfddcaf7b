//! Errors raised by the position adapter.

/// Errors from position import, move replay, and undo bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The FEN string could not be parsed.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// The FEN parsed but describes a position that cannot occur.
    #[error("illegal position {fen}: {reason}")]
    IllegalPosition {
        /// The offending FEN string.
        fen: String,
        /// Why the rules layer rejected it.
        reason: String,
    },

    /// A UCI move string is malformed or not legal in the current position.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The UCI move string that was rejected.
        uci_move: String,
    },

    /// `undo` was called with no matching prior `apply`.
    #[error("undo called with no move to take back")]
    NothingToUndo,
}
