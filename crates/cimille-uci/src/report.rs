//! Formatting of `info` lines.
//!
//! The search scores from White's point of view; UCI wants the score of the
//! side to move, with mates counted in full moves.

use cimille_core::{Color, move_to_uci};
use cimille_engine::ProgressRecord;
use cimille_engine::score::{Score, mate_distance, relative_to};

/// `cp <x>` or `mate <n>` for `score` as seen by `side`.
///
/// `n` is negative when `side` is the one getting mated.
pub fn format_score(score: Score, side: Color) -> String {
    let relative = relative_to(score, side);
    match mate_distance(relative) {
        Some(plies) => {
            let moves = (plies + 1) / 2;
            if relative > 0 {
                format!("mate {moves}")
            } else {
                format!("mate -{moves}")
            }
        }
        None => format!("cp {relative}"),
    }
}

/// Full `info` line for one completed iteration.
pub fn format_info(progress: &ProgressRecord, side: Color) -> String {
    format!(
        "info depth {} score {} nodes {} nps {} time {} pv {}",
        progress.depth,
        format_score(progress.score, side),
        progress.nodes,
        progress.nps,
        progress.elapsed.as_millis(),
        move_to_uci(&progress.best_move),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cimille_core::Position;
    use cimille_engine::score::MATE_SCORE;

    use super::*;

    #[test]
    fn centipawns_follow_side_to_move() {
        assert_eq!(format_score(125, Color::White), "cp 125");
        assert_eq!(format_score(125, Color::Black), "cp -125");
    }

    #[test]
    fn mate_for_side_to_move() {
        assert_eq!(format_score(MATE_SCORE - 1, Color::White), "mate 1");
        assert_eq!(format_score(MATE_SCORE - 3, Color::White), "mate 2");
        assert_eq!(format_score(-(MATE_SCORE - 5), Color::Black), "mate 3");
    }

    #[test]
    fn mate_against_side_to_move() {
        assert_eq!(format_score(-(MATE_SCORE - 2), Color::White), "mate -1");
        assert_eq!(format_score(MATE_SCORE - 4, Color::Black), "mate -2");
    }

    #[test]
    fn info_line_layout() {
        let pos = Position::new();
        let progress = ProgressRecord {
            depth: 3,
            score: -40,
            nodes: 1_234,
            nps: 61_700,
            elapsed: Duration::from_millis(20),
            best_move: pos.parse_uci_move("e2e4").unwrap(),
        };
        assert_eq!(
            format_info(&progress, Color::White),
            "info depth 3 score cp -40 nodes 1234 nps 61700 time 20 pv e2e4"
        );
    }
}
