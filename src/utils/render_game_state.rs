//! ASCII board renderer for the `d` debug command.

use crate::game_state::chess_types::Square;
use crate::game_state::game_state::GameState;
use crate::utils::fen_generator::fen_char;

const RANK_SEPARATOR: &str = " +---+---+---+---+---+---+---+---+\n";

/// Render the board as a bordered ASCII grid, white at the bottom.
pub fn render_game_state(game: &GameState) -> String {
    let mut out = String::new();

    out.push_str(RANK_SEPARATOR);
    for rank in (0..8).rev() {
        out.push_str(" |");
        for file in 0..8 {
            let sq = (rank * 8 + file) as Square;
            let ch = game
                .piece_on(sq)
                .map(|(color, piece)| fen_char(color, piece))
                .unwrap_or(' ');
            out.push(' ');
            out.push(ch);
            out.push_str(" |");
        }
        out.push(' ');
        out.push(char::from(b'1' + rank as u8));
        out.push('\n');
        out.push_str(RANK_SEPARATOR);
    }
    out.push_str("   a   b   c   d   e   f   g   h");

    out
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::game_state::GameState;

    #[test]
    fn startpos_render_shows_both_back_ranks() {
        let out = render_game_state(&GameState::new_game());
        assert!(out.contains('K'));
        assert!(out.contains('k'));
        assert!(out.ends_with("   a   b   c   d   e   f   g   h"));
    }
}
