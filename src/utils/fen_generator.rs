//! GameState-to-FEN serialization.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(game: &GameState) -> String {
    format!(
        "{} {} {} {} {} {}",
        board_field(game),
        match game.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        },
        castling_field(game.castling_rights),
        game.en_passant_square
            .and_then(|sq| square_to_algebraic(sq).ok())
            .unwrap_or_else(|| "-".to_owned()),
        game.halfmove_clock,
        game.fullmove_number
    )
}

fn board_field(game: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut run = 0u8;
        for file in 0..8 {
            let sq = (rank * 8 + file) as Square;
            match game.piece_on(sq) {
                Some((color, piece)) => {
                    if run > 0 {
                        out.push(char::from(b'0' + run));
                        run = 0;
                    }
                    out.push(fen_char(color, piece));
                }
                None => run += 1,
            }
        }
        if run > 0 {
            out.push(char::from(b'0' + run));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

pub fn fen_char(color: Color, piece: PieceKind) -> char {
    let base = match piece {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}

fn castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();
    for (bit, ch) in [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ] {
        if (rights & bit) != 0 {
            out.push(ch);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::game_state::GameState;

    #[test]
    fn starting_position_round_trips() {
        let game = GameState::new_game();
        assert_eq!(game.get_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn custom_position_round_trips() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let game = GameState::from_fen(fen, false).expect("custom FEN should parse");
        assert_eq!(game.get_fen(), fen);
    }

    #[test]
    fn empty_rights_and_target_render_as_dashes() {
        let fen = "4k3/8/8/8/8/8/8/4K3 w - - 12 34";
        let game = GameState::from_fen(fen, false).expect("bare-kings FEN should parse");
        assert_eq!(game.get_fen(), fen);
    }
}
