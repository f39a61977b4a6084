//! Zobrist keys for position identity.
//!
//! Tables are filled at compile time from a fixed splitmix64 stream so keys
//! are deterministic across runs and targets.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

struct Tables {
    piece_square: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

const TABLES: Tables = build_tables();

const fn next_key(state: u64) -> (u64, u64) {
    // splitmix64
    let state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (state, z ^ (z >> 31))
}

const fn build_tables() -> Tables {
    let mut state = 0x5D2E_41C7_9A13_B6F0u64;

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    let mut color = 0;
    while color < 2 {
        let mut piece = 0;
        while piece < 6 {
            let mut sq = 0;
            while sq < 64 {
                let (next_state, key) = next_key(state);
                state = next_state;
                piece_square[color][piece][sq] = key;
                sq += 1;
            }
            piece += 1;
        }
        color += 1;
    }

    let (state_after_side, black_to_move) = next_key(state);
    state = state_after_side;

    let mut castling = [0u64; 16];
    let mut i = 0;
    while i < 16 {
        let (next_state, key) = next_key(state);
        state = next_state;
        castling[i] = key;
        i += 1;
    }

    let mut en_passant_file = [0u64; 8];
    let mut file = 0;
    while file < 8 {
        let (next_state, key) = next_key(state);
        state = next_state;
        en_passant_file[file] = key;
        file += 1;
    }

    Tables {
        piece_square,
        black_to_move,
        castling,
        en_passant_file,
    }
}

/// Recompute the full key for a position from scratch.
pub fn compute_key(game: &GameState) -> u64 {
    let mut key = 0u64;

    for color in [Color::White, Color::Black] {
        for piece in ALL_PIECE_KINDS {
            let mut board = game.pieces[color.index()][piece.index()];
            while board != 0 {
                let sq = board.trailing_zeros() as usize;
                key ^= TABLES.piece_square[color.index()][piece.index()][sq];
                board &= board - 1;
            }
        }
    }

    if game.side_to_move == Color::Black {
        key ^= TABLES.black_to_move;
    }

    key ^= TABLES.castling[(game.castling_rights & 0x0F) as usize];

    if let Some(sq) = game.en_passant_square {
        key ^= TABLES.en_passant_file[(sq % 8) as usize];
    }

    key
}

#[cfg(test)]
mod tests {
    use super::compute_key;
    use crate::game_state::game_state::GameState;

    #[test]
    fn key_changes_with_side_to_move() {
        let game = GameState::new_game();
        let mut flipped_side = game.clone();
        flipped_side.side_to_move = crate::game_state::chess_types::Color::Black;
        assert_ne!(compute_key(&game), compute_key(&flipped_side));
    }

    #[test]
    fn key_is_deterministic() {
        let a = GameState::new_game();
        let b = GameState::new_game();
        assert_eq!(compute_key(&a), compute_key(&b));
        assert_ne!(compute_key(&a), 0);
    }
}
