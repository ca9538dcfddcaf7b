//! Score units and the mate band.
//!
//! Scores are centipawns from White's point of view: positive favours White
//! no matter whose turn it is. Scores with magnitude of at least
//! [`MATE_THRESHOLD`] encode a forced mate as `MATE_SCORE - plies`.

use cimille_core::Color;

/// Evaluation score in centipawns, White-positive.
pub type Score = i32;

/// Bound outside every reachable score.
pub const INF: Score = 30_000;

/// Score of a checkmate on the board, before ply adjustment.
pub const MATE_SCORE: Score = 29_000;

/// Deepest mate distance the band reserves room for.
pub const MAX_PLY: Score = 128;

/// Scores at or beyond this magnitude are mate scores.
pub const MATE_THRESHOLD: Score = MATE_SCORE - MAX_PLY;

/// Score of a drawn position.
pub const DRAW: Score = 0;

/// Score for a position where `side` is checkmated.
pub const fn mated(side: Color) -> Score {
    match side {
        Color::White => -MATE_SCORE,
        Color::Black => MATE_SCORE,
    }
}

pub const fn is_mate(score: Score) -> bool {
    score >= MATE_THRESHOLD || score <= -MATE_THRESHOLD
}

/// Plies until mate for a mate score, `None` otherwise.
pub const fn mate_distance(score: Score) -> Option<i32> {
    if is_mate(score) {
        Some(MATE_SCORE - score.abs())
    } else {
        None
    }
}

/// Move a child's score one ply toward the root.
///
/// Mate scores lose one point of magnitude per ply so that a mate found
/// closer to the root always outranks a deeper one. Other scores pass through.
pub const fn toward_root(score: Score) -> Score {
    if score >= MATE_THRESHOLD {
        score - 1
    } else if score <= -MATE_THRESHOLD {
        score + 1
    } else {
        score
    }
}

/// Convert a White-positive score to the point of view of `side`.
pub const fn relative_to(score: Score, side: Color) -> Score {
    match side {
        Color::White => score,
        Color::Black => -score,
    }
}
