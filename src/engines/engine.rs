//! Asynchronous search entry point.
//!
//! `begin_search` spawns a worker thread and returns immediately so the
//! command loop can keep reading input; `wait_for_search_finished` consumes
//! the handle, which is how the bench harness turns the search synchronous.
//! Cancellation and ponder transitions travel through the shared
//! `SearchControl` block owned by the handle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::prelude::IndexedRandom;

use crate::engines::eval::evaluate;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::generator::legal_moves;
use crate::uci::notation::encode_move;

const MATE_SCORE: i32 = 32_000;
const DEFAULT_DEPTH: u8 = 4;
const MAX_DEPTH: u8 = 8;
const STOP_CHECK_INTERVAL: u64 = 1_024;

/// Aggregated constraints for one `go` command.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    pub mate: Option<u32>,
    pub movetime: Option<u64>,
    pub perft: Option<u8>,
    pub infinite: bool,
    pub ponder: bool,
    pub searchmoves: Vec<Move>,
    pub start_time: Instant,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            wtime: None,
            btime: None,
            winc: None,
            binc: None,
            movestogo: None,
            depth: None,
            nodes: None,
            mate: None,
            movetime: None,
            perft: None,
            infinite: false,
            ponder: false,
            searchmoves: Vec::new(),
            start_time: Instant::now(),
        }
    }
}

/// Shared stop/ponder state between the command loop and the worker.
#[derive(Debug, Default)]
pub struct SearchControl {
    pub stop: AtomicBool,
    pub ponder: AtomicBool,
    pub stop_on_ponderhit: AtomicBool,
}

/// Handle to one in-flight search; dropping it without `wait` detaches.
pub struct SearchHandle {
    thread: JoinHandle<()>,
}

impl SearchHandle {
    pub fn wait(self) {
        let _ = self.thread.join();
    }
}

/// The search-engine abstraction consumed by the UCI front end.
pub struct SearchEngine {
    control: Arc<SearchControl>,
    nodes: Arc<AtomicU64>,
    handle: Option<SearchHandle>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            control: Arc::new(SearchControl::default()),
            nodes: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Start an asynchronous search on a snapshot of the position.
    ///
    /// Any previous search is stopped and joined first, so at most one
    /// worker exists at a time.
    pub fn begin_search(&mut self, game: &GameState, request: SearchRequest) {
        self.signal_stop();
        self.wait_for_search_finished();

        self.control.stop.store(false, Ordering::SeqCst);
        self.control.ponder.store(request.ponder, Ordering::SeqCst);
        self.control.stop_on_ponderhit.store(false, Ordering::SeqCst);
        self.nodes.store(0, Ordering::SeqCst);

        let worker_game = game.clone();
        let control = Arc::clone(&self.control);
        let nodes = Arc::clone(&self.nodes);

        let thread = thread::spawn(move || {
            search_worker(worker_game, request, &control, &nodes);
        });
        self.handle = Some(SearchHandle { thread });
    }

    /// Block until the in-flight search (if any) has reported its best move.
    pub fn wait_for_search_finished(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.wait();
        }
    }

    #[inline]
    pub fn nodes_searched(&self) -> u64 {
        self.nodes.load(Ordering::SeqCst)
    }

    /// Discard cross-game cached state (counters here; a transposition table
    /// in a bigger engine).
    pub fn new_game(&mut self) {
        self.signal_stop();
        self.wait_for_search_finished();
        self.nodes.store(0, Ordering::SeqCst);
    }

    #[inline]
    pub fn signal_stop(&self) {
        self.control.stop.store(true, Ordering::SeqCst);
    }

    /// `ponderhit` arrived: the predicted move was played, so the in-flight
    /// search becomes a normal timed search.
    #[inline]
    pub fn clear_ponder(&self) {
        self.control.ponder.store(false, Ordering::SeqCst);
    }

    #[inline]
    pub fn stop_on_ponderhit(&self) -> bool {
        self.control.stop_on_ponderhit.load(Ordering::SeqCst)
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        self.signal_stop();
        self.wait_for_search_finished();
    }
}

struct WorkerState<'a> {
    control: &'a SearchControl,
    nodes: &'a AtomicU64,
    local_nodes: u64,
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    aborted: bool,
}

impl WorkerState<'_> {
    /// Flush the local node count and poll the abort conditions.
    fn should_abort(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.local_nodes % STOP_CHECK_INTERVAL != 0 {
            return false;
        }

        self.nodes.store(self.local_nodes, Ordering::Relaxed);

        if self.control.stop.load(Ordering::Relaxed) {
            self.aborted = true;
        } else if self
            .node_limit
            .is_some_and(|limit| self.local_nodes >= limit)
        {
            self.aborted = true;
        } else if !self.control.ponder.load(Ordering::Relaxed) {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.aborted = true;
                }
            }
        }

        self.aborted
    }
}

fn search_worker(
    mut game: GameState,
    request: SearchRequest,
    control: &SearchControl,
    nodes: &AtomicU64,
) {
    let mut root_moves = legal_moves(&game);
    if !request.searchmoves.is_empty() {
        root_moves.retain(|mv| request.searchmoves.contains(mv));
    }

    let chess960 = game.chess960;

    if root_moves.is_empty() {
        println!("bestmove (none)");
        return;
    }

    let target_depth = request
        .depth
        .or(request.mate.map(|m| (2 * m).min(MAX_DEPTH as u32) as u8))
        .unwrap_or(DEFAULT_DEPTH)
        .clamp(1, MAX_DEPTH);

    let mut state = WorkerState {
        control,
        nodes,
        local_nodes: 0,
        node_limit: request.nodes,
        deadline: compute_deadline(&game, &request),
        aborted: false,
    };

    let mut best_move = root_moves[0];
    let mut best_score = -MATE_SCORE;

    for depth in 1..=target_depth {
        let mut depth_best: Vec<Move> = Vec::new();
        let mut depth_score = -MATE_SCORE;
        let mut complete = true;

        for &mv in &root_moves {
            let Ok(undo) = game.make_move(mv) else {
                continue;
            };
            let score = -negamax(&mut game, depth - 1, -MATE_SCORE, MATE_SCORE, &mut state);
            game.unmake_move(&undo);

            if state.aborted {
                complete = false;
                break;
            }

            if score > depth_score {
                depth_score = score;
                depth_best.clear();
                depth_best.push(mv);
            } else if score == depth_score {
                depth_best.push(mv);
            }
        }

        if complete && !depth_best.is_empty() {
            // Break ties randomly so repeated games vary.
            let mut rng = rand::rng();
            if let Some(&choice) = depth_best.choose(&mut rng) {
                best_move = choice;
                best_score = depth_score;
            }

            let elapsed = request.start_time.elapsed().as_millis().max(1);
            println!(
                "info depth {} score cp {} nodes {} time {} nps {} pv {}",
                depth,
                best_score,
                state.local_nodes,
                elapsed,
                (state.local_nodes as u128 * 1_000 / elapsed),
                encode_move(best_move, chess960)
            );
        }

        if state.aborted {
            break;
        }
    }

    nodes.store(state.local_nodes, Ordering::SeqCst);

    // In infinite or ponder mode the best move is held back until the
    // controller sends stop (or ponderhit converts the search).
    if request.ponder {
        control.stop_on_ponderhit.store(true, Ordering::SeqCst);
        while !control.stop.load(Ordering::SeqCst) && control.ponder.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
        }
    } else if request.infinite {
        while !control.stop.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
        }
    }

    println!("bestmove {}", encode_move(best_move, chess960));
}

fn negamax(
    game: &mut GameState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    state: &mut WorkerState<'_>,
) -> i32 {
    state.local_nodes += 1;
    if state.should_abort() {
        return evaluate(game);
    }

    if depth == 0 {
        return evaluate(game);
    }

    let moves = legal_moves(game);
    if moves.is_empty() {
        return if crate::move_generation::attacks::is_king_in_check(game, game.side_to_move) {
            -MATE_SCORE + 1
        } else {
            0
        };
    }

    let mut best = -MATE_SCORE;
    for mv in moves {
        let Ok(undo) = game.make_move(mv) else {
            continue;
        };
        let score = -negamax(game, depth - 1, -beta, -alpha, state);
        game.unmake_move(&undo);

        if state.aborted {
            return best.max(score);
        }
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Derive a wall-clock budget from the request, if one applies.
///
/// `movetime` wins outright; otherwise the mover's clock is split by
/// `movestogo` (default 20 segments) plus half the increment. Infinite and
/// depth/node-bounded searches get no deadline.
fn compute_deadline(game: &GameState, request: &SearchRequest) -> Option<Instant> {
    if request.infinite {
        return None;
    }

    if let Some(ms) = request.movetime {
        return Some(request.start_time + Duration::from_millis(ms));
    }

    let (remaining, increment) = match game.side_to_move {
        Color::White => (request.wtime, request.winc),
        Color::Black => (request.btime, request.binc),
    };

    let remaining = remaining?;
    let segments = request.movestogo.unwrap_or(20).max(1) as u64;
    let budget = (remaining / segments) + increment.unwrap_or(0) / 2;
    Some(request.start_time + Duration::from_millis(budget.max(1)))
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{compute_deadline, SearchEngine, SearchRequest};
    use crate::game_state::game_state::GameState;

    #[test]
    fn depth_bounded_search_finishes_and_counts_nodes() {
        let mut engine = SearchEngine::new();
        let game = GameState::new_game();

        let request = SearchRequest {
            depth: Some(2),
            ..SearchRequest::default()
        };
        engine.begin_search(&game, request);
        engine.wait_for_search_finished();

        assert!(engine.nodes_searched() > 0);
    }

    #[test]
    fn stop_terminates_an_infinite_search() {
        let mut engine = SearchEngine::new();
        let game = GameState::new_game();

        let request = SearchRequest {
            infinite: true,
            ..SearchRequest::default()
        };
        engine.begin_search(&game, request);
        engine.signal_stop();
        engine.wait_for_search_finished();
    }

    #[test]
    fn finished_ponder_search_holds_until_ponder_is_cleared() {
        let mut engine = SearchEngine::new();
        let game = GameState::new_game();

        engine.begin_search(
            &game,
            SearchRequest {
                ponder: true,
                depth: Some(1),
                ..SearchRequest::default()
            },
        );

        // The bounded search finishes quickly, then raises the hold flag.
        let deadline = Instant::now() + Duration::from_secs(5);
        while !engine.stop_on_ponderhit() {
            assert!(
                Instant::now() < deadline,
                "worker never reached the ponder hold"
            );
            thread::sleep(Duration::from_millis(1));
        }

        // Clearing the ponder flag releases the held result.
        engine.clear_ponder();
        engine.wait_for_search_finished();
        assert!(engine.nodes_searched() > 0);
    }

    #[test]
    fn new_game_clears_the_node_counter() {
        let mut engine = SearchEngine::new();
        let game = GameState::new_game();
        engine.begin_search(
            &game,
            SearchRequest {
                depth: Some(1),
                ..SearchRequest::default()
            },
        );
        engine.wait_for_search_finished();
        engine.new_game();
        assert_eq!(engine.nodes_searched(), 0);
    }

    #[test]
    fn movetime_produces_a_deadline_and_infinite_does_not() {
        let game = GameState::new_game();

        let timed = SearchRequest {
            movetime: Some(100),
            ..SearchRequest::default()
        };
        assert!(compute_deadline(&game, &timed).is_some());

        let infinite = SearchRequest {
            infinite: true,
            movetime: Some(100),
            ..SearchRequest::default()
        };
        assert!(compute_deadline(&game, &infinite).is_none());

        let clocked = SearchRequest {
            wtime: Some(60_000),
            movestogo: Some(30),
            ..SearchRequest::default()
        };
        assert!(compute_deadline(&game, &clocked).is_some());
    }
}
