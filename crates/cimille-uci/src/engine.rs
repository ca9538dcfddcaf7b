//! Event-driven UCI engine: commands on the main thread, search on a worker.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};

use tracing::{debug, error, info, warn};

use cimille_core::{Position, move_to_uci};
use cimille_engine::{
    SearchError, SearchJob, SearchResult, Searcher, TimeConfig, TimeInputs, compute_limits,
};

use crate::command::{Command, GoParams, MAX_MOVE_OVERHEAD_MS, UciOption, parse_command};
use crate::error::UciError;
use crate::report::format_info;

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Time manager constants; `MoveOverhead` sets the safety buffer.
    pub time: TimeConfig,
}

/// Whether a search is running.
enum EngineState {
    Idle,
    Searching,
}

/// Events processed by the main engine loop.
enum EngineEvent {
    UciCommand(Result<Command, UciError>),
    SearchDone(SearchDone),
    InputClosed,
}

/// Payload returned by the search thread when it finishes.
struct SearchDone {
    result: Result<SearchResult, SearchError>,
    position: Position,
}

/// The UCI engine, holding the current position and search state.
///
/// The position is moved into the search thread for the duration of a
/// search and handed back in [`SearchDone`].
pub struct UciEngine {
    /// `None` while the search thread owns it.
    position: Option<Position>,
    /// Position or new game received mid-search, applied when the search returns.
    pending_position: Option<Position>,
    /// `go` received after a stop, started once the stopped search returns.
    pending_go: Option<GoParams>,
    state: EngineState,
    stop_flag: Arc<AtomicBool>,
    config: EngineConfig,
}

impl UciEngine {
    /// Create a new engine with the starting position.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            position: Some(Position::new()),
            pending_position: None,
            pending_go: None,
            state: EngineState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Run the UCI event loop, reading from stdin until `quit` or input closes.
    pub fn run(mut self) -> Result<(), UciError> {
        let (tx, rx) = mpsc::channel::<EngineEvent>();

        let stdin_tx = tx.clone();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let event = match line {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        debug!(cmd = %trimmed, "received UCI command");
                        EngineEvent::UciCommand(parse_command(trimmed))
                    }
                    Err(err) => EngineEvent::UciCommand(Err(UciError::from(err))),
                };
                let failed = matches!(event, EngineEvent::UciCommand(Err(UciError::Io { .. })));
                if stdin_tx.send(event).is_err() || failed {
                    break;
                }
            }
            let _ = stdin_tx.send(EngineEvent::InputClosed);
        });

        info!("cimille ready");

        for event in &rx {
            match event {
                EngineEvent::UciCommand(Ok(cmd)) => match cmd {
                    Command::Uci => self.handle_uci(),
                    Command::IsReady => self.handle_isready(),
                    Command::UciNewGame => self.handle_new_position(Position::new()),
                    Command::Position(pos) => self.handle_new_position(pos),
                    Command::Go(params) => self.handle_go(&params, &tx),
                    Command::SetOption(opt) => self.handle_setoption(opt),
                    Command::Stop => self.handle_stop(),
                    Command::Quit => {
                        if matches!(self.state, EngineState::Searching) {
                            self.handle_stop();
                            for ev in &rx {
                                if let EngineEvent::SearchDone(done) = ev {
                                    self.pending_go = None;
                                    self.finish_search(done, &tx);
                                    break;
                                }
                            }
                        }
                        break;
                    }
                    Command::Unknown(cmd) => {
                        if !cmd.is_empty() {
                            debug!(%cmd, "ignoring unknown command");
                        }
                    }
                },
                EngineEvent::UciCommand(Err(e)) => {
                    warn!(error = %e, "rejected UCI input");
                }
                EngineEvent::SearchDone(done) => self.finish_search(done, &tx),
                EngineEvent::InputClosed => break,
            }
        }

        info!("cimille shutting down");
        Ok(())
    }

    fn handle_uci(&self) {
        println!("id name Cimille {}", env!("CARGO_PKG_VERSION"));
        println!("id author the Cimille developers");
        println!(
            "option name MoveOverhead type spin default {} min 0 max {}",
            TimeConfig::default().move_overhead.as_millis(),
            MAX_MOVE_OVERHEAD_MS
        );
        println!("uciok");
    }

    fn handle_isready(&self) {
        println!("readyok");
    }

    /// `position` and `ucinewgame`: replace the position, or queue it behind a running search.
    fn handle_new_position(&mut self, pos: Position) {
        match self.state {
            EngineState::Idle => self.position = Some(pos),
            EngineState::Searching => {
                debug!("position received mid-search, stopping");
                self.handle_stop();
                self.pending_position = Some(pos);
            }
        }
    }

    fn handle_setoption(&mut self, option: UciOption) {
        match option {
            UciOption::MoveOverhead(overhead) => {
                self.config.time.move_overhead = overhead;
                info!(overhead_ms = overhead.as_millis() as u64, "move overhead set");
            }
        }
    }

    fn handle_go(&mut self, params: &GoParams, tx: &mpsc::Sender<EngineEvent>) {
        if matches!(self.state, EngineState::Searching) {
            if self.stop_flag.load(Ordering::Acquire) {
                debug!("go received while a stopped search unwinds, queueing");
                self.pending_go = Some(params.clone());
            } else {
                warn!("go received while searching, ignoring");
            }
            return;
        }
        let Some(mut position) = self.position.take() else {
            warn!("go received without a position, ignoring");
            return;
        };

        let side = position.side_to_move();
        let inputs = TimeInputs {
            moves_to_go: params.movestogo,
            move_time: params.movetime,
            depth: params.depth,
            infinite: params.infinite,
            ..TimeInputs::for_side(side, params.wtime, params.btime, params.winc, params.binc)
        };
        let limits = compute_limits(&inputs, &self.config.time);
        debug!(?limits, "search limits");

        // Created here so a `stop` that arrives before the thread starts is kept.
        let job = SearchJob::new(limits, Arc::clone(&self.stop_flag));
        let tx = tx.clone();

        std::thread::spawn(move || {
            let mut searcher = Searcher::new(job);
            let result = searcher.run(&mut position, |progress| {
                println!("{}", format_info(progress, side));
            });
            let _ = tx.send(EngineEvent::SearchDone(SearchDone { result, position }));
        });

        self.state = EngineState::Searching;
    }

    fn handle_stop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    fn finish_search(&mut self, done: SearchDone, tx: &mpsc::Sender<EngineEvent>) {
        self.position = Some(self.pending_position.take().unwrap_or(done.position));
        self.state = EngineState::Idle;

        match done.result {
            Ok(result) => match result.best_move {
                Some(mv) => println!("bestmove {}", move_to_uci(&mv)),
                None => {
                    println!("info string no legal moves");
                    println!("bestmove 0000");
                }
            },
            Err(err) => {
                error!(error = %err, "search aborted");
                println!("bestmove 0000");
            }
        }

        if let Some(params) = self.pending_go.take() {
            self.handle_go(&params, tx);
        }
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn aborted_search() -> SearchDone {
        SearchDone {
            result: Err(SearchError::from(cimille_core::PositionError::NothingToUndo)),
            position: Position::new(),
        }
    }

    fn run_go(engine: &mut UciEngine, line: &str) -> SearchDone {
        let (tx, rx) = mpsc::channel();
        match parse_command(line).unwrap() {
            Command::Go(params) => engine.handle_go(&params, &tx),
            _ => panic!("expected go"),
        }
        loop {
            if let EngineEvent::SearchDone(done) = rx.recv().unwrap() {
                return done;
            }
        }
    }

    #[test]
    fn go_hands_position_back() {
        let mut engine = UciEngine::new();
        let done = run_go(&mut engine, "go depth 1");
        assert!(done.result.as_ref().unwrap().best_move.is_some());
        assert!(engine.position.is_none());
        let (tx, _rx) = mpsc::channel();
        engine.finish_search(done, &tx);
        assert_eq!(engine.position.unwrap().to_fen(), Position::new().to_fen());
    }

    #[test]
    fn position_during_search_is_deferred() {
        let mut engine = UciEngine::new();
        engine.state = EngineState::Searching;
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
        engine.handle_new_position(Position::from_fen(fen).unwrap());
        assert!(engine.stop_flag.load(Ordering::Acquire));

        let (tx, _rx) = mpsc::channel();
        engine.finish_search(aborted_search(), &tx);
        assert_eq!(engine.position.as_ref().unwrap().to_fen(), fen);
        assert!(matches!(engine.state, EngineState::Idle));
    }

    #[test]
    fn go_while_searching_is_ignored() {
        let mut engine = UciEngine::new();
        engine.state = EngineState::Searching;
        let (tx, rx) = mpsc::channel();
        engine.handle_go(&GoParams::default(), &tx);
        assert!(engine.position.is_some());
        assert!(engine.pending_go.is_none());
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn go_after_stop_and_position_starts_once_search_returns() {
        let mut engine = UciEngine::new();
        let (tx, rx) = mpsc::channel();
        // A running search owns the position.
        engine.position = None;
        engine.state = EngineState::Searching;

        engine.handle_stop();
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
        engine.handle_new_position(Position::from_fen(fen).unwrap());
        match parse_command("go depth 1").unwrap() {
            Command::Go(params) => engine.handle_go(&params, &tx),
            _ => panic!("expected go"),
        }
        assert!(engine.pending_go.is_some());

        engine.finish_search(aborted_search(), &tx);
        assert!(matches!(engine.state, EngineState::Searching));
        assert!(engine.pending_go.is_none());
        assert!(engine.position.is_none(), "queued search should own the position");

        let done = loop {
            if let EngineEvent::SearchDone(done) = rx.recv().unwrap() {
                break done;
            }
        };
        assert_eq!(done.position.to_fen(), fen);
        assert!(done.result.unwrap().best_move.is_some());
    }

    #[test]
    fn setoption_updates_overhead() {
        let mut engine = UciEngine::new();
        engine.handle_setoption(UciOption::MoveOverhead(Duration::from_millis(250)));
        assert_eq!(engine.config.time.move_overhead, Duration::from_millis(250));
    }

    #[test]
    fn stalemate_search_returns_no_move() {
        let mut engine = UciEngine::new();
        engine.handle_new_position(Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap());
        let done = run_go(&mut engine, "go depth 2");
        assert!(done.result.as_ref().unwrap().best_move.is_none());
    }
}
