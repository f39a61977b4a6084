//! Coordinate-notation move codec.
//!
//! Castling is held internally as king-captures-rook; `encode_move` rewrites
//! the displayed destination to the fixed g/c file unless the chess960
//! notation variant is in effect, in which case the rook square passes
//! through unchanged. Decoding is defined as the inverse of encoding over the
//! legal-move set: a string that no legal move encodes to yields `Move::None`.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::generator::legal_moves;

/// Placeholder emitted for the "no move" sentinel.
pub const NO_MOVE_TEXT: &str = "(none)";

/// Text form of the null move (a pass).
pub const NULL_MOVE_TEXT: &str = "0000";

pub fn encode_move(mv: Move, chess960: bool) -> String {
    let data = match mv {
        Move::None => return NO_MOVE_TEXT.to_owned(),
        Move::Null => return NULL_MOVE_TEXT.to_owned(),
        Move::Real(data) => data,
    };

    let mut to = data.to;
    if data.kind == MoveKind::Castling && !chess960 {
        let file = if data.to > data.from { 6 } else { 2 };
        to = (data.from & !7) + file;
    }

    let mut out = String::with_capacity(5);
    push_square(&mut out, data.from);
    push_square(&mut out, to);

    if let Some(piece) = data.promotion {
        out.push(match piece {
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            _ => 'q',
        });
    }

    out
}

/// Decode a coordinate-notation token against the current position.
///
/// Returns `Move::None` when no legal move encodes to the given text, which
/// covers both malformed tokens and syntactically valid but illegal moves.
pub fn decode_move(text: &str, game: &GameState) -> Move {
    let mut token = text.to_owned();
    // Some controllers send the promotion piece in uppercase.
    if token.len() == 5 {
        let mut bytes = token.into_bytes();
        bytes[4] = bytes[4].to_ascii_lowercase();
        token = String::from_utf8(bytes).unwrap_or_default();
    }

    for mv in legal_moves(game) {
        if encode_move(mv, game.chess960) == token {
            return mv;
        }
    }

    Move::None
}

fn push_square(out: &mut String, square: Square) {
    out.push(char::from(b'a' + square % 8));
    out.push(char::from(b'1' + square / 8));
}

#[cfg(test)]
mod tests {
    use super::{decode_move, encode_move, NO_MOVE_TEXT, NULL_MOVE_TEXT};
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::generator::legal_moves;

    #[test]
    fn sentinels_encode_to_fixed_text_in_both_variants() {
        for chess960 in [false, true] {
            assert_eq!(encode_move(Move::None, chess960), NO_MOVE_TEXT);
            assert_eq!(encode_move(Move::Null, chess960), NULL_MOVE_TEXT);
        }
    }

    #[test]
    fn every_legal_move_round_trips_in_both_variants() {
        let fens = [
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
        ];

        for chess960 in [false, true] {
            for fen in fens {
                let game = GameState::from_fen(fen, chess960).expect("FEN should parse");
                for mv in legal_moves(&game) {
                    let text = encode_move(mv, chess960);
                    assert_eq!(decode_move(&text, &game), mv, "token {text} in {fen}");
                }
            }
        }
    }

    #[test]
    fn castling_display_depends_on_the_variant() {
        let mv = Move::castling(4, 7);
        assert_eq!(encode_move(mv, false), "e1g1");
        assert_eq!(encode_move(mv, true), "e1h1");

        let queenside = Move::castling(60, 56);
        assert_eq!(encode_move(queenside, false), "e8c8");
        assert_eq!(encode_move(queenside, true), "e8a8");
    }

    #[test]
    fn promotion_suffix_is_lowercased_on_decode() {
        let game = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1", false)
            .expect("FEN should parse");
        let mv = decode_move("a7a8Q", &game);
        assert_eq!(mv, Move::promotion(48, 56, PieceKind::Queen));
    }

    #[test]
    fn illegal_or_garbage_tokens_decode_to_none() {
        let game = GameState::new_game();
        assert_eq!(decode_move("e2e5", &game), Move::None);
        assert_eq!(decode_move("xyzzy", &game), Move::None);
        assert_eq!(decode_move("0000", &game), Move::None);
        assert_eq!(decode_move("", &game), Move::None);
    }
}
