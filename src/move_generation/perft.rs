//! Node-counting tree walk, used by `go perft N` and the throughput bench.

use crate::game_state::game_state::GameState;
use crate::move_generation::generator::legal_moves;

pub fn perft(game: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(game);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in moves {
        let Ok(undo) = game.make_move(mv) else {
            continue;
        };
        nodes += perft(game, depth - 1);
        game.unmake_move(&undo);
    }
    nodes
}
