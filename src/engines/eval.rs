//! Static evaluation: material plus a small centralization bonus.
//!
//! Deliberately simple; it exists so the search and the `eval` debug command
//! have a real scoring function to exercise, not to play strong chess.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

/// Centipawn piece values, indexed by `PieceKind::index()`.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Score from the side to move's point of view, in centipawns.
pub fn evaluate(game: &GameState) -> i32 {
    let white = side_score(game, Color::White);
    let black = side_score(game, Color::Black);
    match game.side_to_move {
        Color::White => white - black,
        Color::Black => black - white,
    }
}

fn side_score(game: &GameState, color: Color) -> i32 {
    let mut score = 0i32;

    for piece in ALL_PIECE_KINDS {
        let mut board = game.pieces[color.index()][piece.index()];
        while board != 0 {
            let sq = board.trailing_zeros() as Square;
            board &= board - 1;
            score += PIECE_VALUES[piece.index()] + centralization_bonus(sq);
        }
    }

    score
}

/// Small bonus for squares near the middle of the board.
fn centralization_bonus(square: Square) -> i32 {
    let file = (square % 8) as i32;
    let rank = (square / 8) as i32;
    let file_center = (2 * file - 7).abs();
    let rank_center = (2 * rank - 7).abs();
    (7 - file_center.max(rank_center)) / 2
}

/// Human-readable evaluation breakdown for the `eval` debug command.
pub fn trace(game: &GameState) -> String {
    let mut out = String::new();
    out.push_str("      term |  white |  black\n");
    out.push_str("-----------+--------+--------\n");

    for piece in ALL_PIECE_KINDS {
        let label = match piece {
            PieceKind::Pawn => "pawns",
            PieceKind::Knight => "knights",
            PieceKind::Bishop => "bishops",
            PieceKind::Rook => "rooks",
            PieceKind::Queen => "queens",
            PieceKind::King => "kings",
        };

        let mut per_side = [0i32; 2];
        for color in [Color::White, Color::Black] {
            let count =
                game.pieces[color.index()][piece.index()].count_ones() as i32;
            per_side[color.index()] = count * PIECE_VALUES[piece.index()];
        }

        out.push_str(&format!(
            "{label:>10} | {:>6} | {:>6}\n",
            per_side[0], per_side[1]
        ));
    }

    let white_total = side_score(game, Color::White);
    let black_total = side_score(game, Color::Black);
    out.push_str(&format!(
        "\nTotal evaluation: {} cp (white side)",
        white_total - black_total
    ));

    out
}
