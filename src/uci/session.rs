//! Per-process UCI session state.
//!
//! One `UciSession` exists for the lifetime of the command loop; every
//! handler takes it by `&mut` reference so there is no ambient global state.

use crate::engines::engine::SearchEngine;
use crate::game_state::game_state::GameState;
use crate::game_state::undo_state::UndoState;
use crate::learning::LearningControl;
use crate::uci::options::OptionTable;

pub struct UciSession {
    pub game: GameState,
    /// One seed record plus one record per move applied since the last
    /// `position` command.
    pub undo_stack: Vec<UndoState>,
    pub options: OptionTable,
    pub engine: SearchEngine,
    pub learning: LearningControl,
}

impl Default for UciSession {
    fn default() -> Self {
        Self::new()
    }
}

impl UciSession {
    pub fn new() -> Self {
        Self {
            game: GameState::new_game(),
            undo_stack: vec![UndoState::seed()],
            options: OptionTable::new(),
            engine: SearchEngine::new(),
            learning: LearningControl::new(),
        }
    }

    /// Replace the live position and discard the whole undo history.
    pub fn reset_position(&mut self, game: GameState) {
        self.game = game;
        self.undo_stack.clear();
        self.undo_stack.push(UndoState::seed());
    }
}
