//! Crate root module declarations for the Damson Chess engine project.
//!
//! This file exposes all top-level subsystems (game state, move generation,
//! search engine, UCI protocol handling, learning, and utility helpers) so
//! the binary, tests, and external tooling can import stable module paths.

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
    pub mod zobrist;
}

pub mod move_generation {
    pub mod attacks;
    pub mod generator;
    pub mod perft;
}

pub mod engines {
    pub mod engine;
    pub mod eval;
}

pub mod uci {
    pub mod bench;
    pub mod move_check;
    pub mod notation;
    pub mod options;
    pub mod session;
    pub mod uci_loop;
}

pub mod learning;

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
}
