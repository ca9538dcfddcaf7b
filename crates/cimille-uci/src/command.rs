//! UCI command parsing.

use std::time::Duration;

use cimille_core::Position;

use crate::error::UciError;

/// Parameters for the `go` command.
///
/// All fields are optional; a bare `go` uses defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// White's remaining time.
    pub wtime: Option<Duration>,
    /// Black's remaining time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
    /// Moves until next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u8>,
    /// Search for exactly this duration.
    pub movetime: Option<Duration>,
    /// Search until `stop` (no time limit).
    pub infinite: bool,
}

/// An option set through `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOption {
    /// Safety buffer subtracted from clock-derived budgets.
    MoveOverhead(Duration),
}

/// Upper bound accepted for `MoveOverhead`, in milliseconds.
pub const MAX_MOVE_OVERHEAD_MS: u64 = 5_000;

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci` -- identify the engine.
    Uci,
    /// `isready` -- synchronization ping.
    IsReady,
    /// `ucinewgame` -- reset to the starting position.
    UciNewGame,
    /// `position` -- a position with its move list already replayed.
    Position(Position),
    /// `go` -- start searching with given parameters.
    Go(GoParams),
    /// `setoption name <id> value <x>`.
    SetOption(UciOption),
    /// `stop` -- halt the current search.
    Stop,
    /// `quit` -- exit the engine.
    Quit,
    /// Unrecognized command (silently ignored per UCI convention).
    Unknown(String),
}

/// Parse a single line of UCI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&keyword, args)) = tokens.split_first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match keyword {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(args),
        "go" => parse_go(args),
        "setoption" => parse_setoption(args),
        _ => Ok(Command::Unknown(keyword.to_string())),
    }
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves e2e4 d7d5 ...]`
/// - `position fen <fen-string> [moves e2e4 d7d5 ...]`
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let (mut position, rest) = match tokens.split_first() {
        Some((&"startpos", rest)) => (Position::new(), rest),
        Some((&"fen", rest)) => {
            let fen_len = rest
                .iter()
                .position(|&token| token == "moves")
                .unwrap_or(rest.len());
            let fen = rest[..fen_len].join(" ");
            (Position::from_fen(&fen)?, &rest[fen_len..])
        }
        _ => return Err(UciError::MalformedPosition),
    };

    if let Some((&"moves", moves)) = rest.split_first() {
        position.apply_uci_moves(moves)?;
    }

    Ok(Command::Position(position))
}

/// Parse the `go` command arguments.
///
/// Supports: wtime, btime, winc, binc, movestogo, depth, movetime,
/// infinite. Unknown tokens are silently skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();

    let mut i = 0;
    while i < tokens.len() {
        let value = tokens.get(i + 1);
        match tokens[i] {
            "wtime" => params.wtime = Some(parse_millis(value, "wtime")?),
            "btime" => params.btime = Some(parse_millis(value, "btime")?),
            "winc" => params.winc = Some(parse_millis(value, "winc")?),
            "binc" => params.binc = Some(parse_millis(value, "binc")?),
            "movestogo" => params.movestogo = Some(parse_int(value, "movestogo")?),
            "depth" => params.depth = Some(parse_int(value, "depth")?),
            "movetime" => params.movetime = Some(parse_millis(value, "movetime")?),
            "infinite" => {
                params.infinite = true;
                i += 1;
                continue;
            }
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    Ok(Command::Go(params))
}

/// Parse `setoption name <id> [value <x>]`.
///
/// Option names may contain spaces and are matched case-insensitively.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let Some((&"name", rest)) = tokens.split_first() else {
        return Err(UciError::UnknownOption {
            name: tokens.join(" "),
        });
    };

    let name_len = rest
        .iter()
        .position(|&token| token == "value")
        .unwrap_or(rest.len());
    let name = rest[..name_len].join(" ");
    let value = rest.get(name_len + 1..).unwrap_or_default().join(" ");

    if name.eq_ignore_ascii_case("MoveOverhead") {
        let ms: u64 = value.parse().map_err(|_| UciError::InvalidOptionValue {
            name: name.clone(),
            value: value.clone(),
        })?;
        return Ok(Command::SetOption(UciOption::MoveOverhead(
            Duration::from_millis(ms.min(MAX_MOVE_OVERHEAD_MS)),
        )));
    }

    Err(UciError::UnknownOption { name })
}

/// Parse a millisecond value from a token.
///
/// Negative clocks, which some GUIs send after a flag fall, read as zero.
fn parse_millis(token: Option<&&str>, param: &str) -> Result<Duration, UciError> {
    let ms: i64 = parse_int(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

/// Parse an integer value from a token.
fn parse_int<T: std::str::FromStr>(token: Option<&&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}
